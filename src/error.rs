use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetaError {
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("No generation metadata found")]
    NoMetadata,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MetaError>;
