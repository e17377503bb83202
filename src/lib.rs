//! promptmeta - AI image generation metadata extraction
//!
//! Recovers the prompt, negative prompt, and sampler parameters that
//! Stable Diffusion frontends embed in their output images:
//! - JPEG: EXIF UserComment (8-byte character code prefix + UTF-8 payload)
//! - PNG: tEXt/iTXt chunks ("parameters" for Automatic1111, "Description"
//!   for NovelAI)
//!
//! The decoding and parsing core (`comment`, `parser`) is pure and total;
//! the container readers (`jpeg`, `png`, `extract`) feed it.

mod comment;
mod error;
mod extract;
mod jpeg;
mod parser;
mod png;

pub use comment::decode_user_comment;
pub use error::{MetaError, Result};
pub use extract::{from_bytes, from_path, raw_text_from_bytes, raw_text_from_path};
pub use parser::{parse, MetadataParser, ParamTable, ParsedMetadata, KNOWN_PARAMS};
pub use png::{generation_text, text_chunks};
