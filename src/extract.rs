//! Top-level extraction: image bytes in, parsed metadata out.
//!
//! Format routing uses magic-number detection, never the file extension:
//! JPEG goes through EXIF UserComment decoding, PNG through text chunk
//! lookup. Everything else is unsupported.

use std::path::Path;

use tracing::debug;

use crate::comment::decode_user_comment;
use crate::error::{MetaError, Result};
use crate::parser::{self, ParsedMetadata};
use crate::{jpeg, png};

/// Recover the raw metadata text blob from image bytes.
pub fn raw_text_from_bytes(data: &[u8]) -> Result<String> {
    let kind = infer::get(data)
        .ok_or_else(|| MetaError::UnsupportedFormat("unknown".into()))?;

    match kind.mime_type() {
        "image/jpeg" => {
            debug!("JPEG detected, reading EXIF UserComment");
            let raw = jpeg::user_comment(data).ok_or(MetaError::NoMetadata)?;
            Ok(decode_user_comment(&raw))
        }
        "image/png" => {
            debug!("PNG detected, reading text chunks");
            let chunks = png::text_chunks(data);
            png::generation_text(&chunks)
                .map(str::to_owned)
                .ok_or(MetaError::NoMetadata)
        }
        other => Err(MetaError::UnsupportedFormat(other.to_string())),
    }
}

/// Extract and parse generation metadata from image bytes.
pub fn from_bytes(data: &[u8]) -> Result<ParsedMetadata> {
    Ok(parser::parse(&raw_text_from_bytes(data)?))
}

/// Recover the raw metadata text blob from an image file.
pub fn raw_text_from_path(path: impl AsRef<Path>) -> Result<String> {
    let data = std::fs::read(path)?;
    raw_text_from_bytes(&data)
}

/// Extract and parse generation metadata from an image file.
pub fn from_path(path: impl AsRef<Path>) -> Result<ParsedMetadata> {
    let data = std::fs::read(path)?;
    from_bytes(&data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_bytes_unsupported() {
        let err = from_bytes(b"plain text, nothing image-like").unwrap_err();
        assert!(matches!(err, MetaError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_recognized_but_foreign_format_unsupported() {
        // GIF magic is detected by infer but not handled here
        let err = from_bytes(b"GIF89a\x01\x00\x01\x00\x00\x00\x00").unwrap_err();
        assert!(matches!(err, MetaError::UnsupportedFormat(ref f) if f == "image/gif"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = from_path("/nonexistent/image.png").unwrap_err();
        assert!(matches!(err, MetaError::Io(_)));
    }
}
