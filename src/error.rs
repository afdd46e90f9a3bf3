use thiserror::Error;

/// Failures visible to the caller of [`crate::Compressor::compress`].
///
/// Codec failures are normally absorbed by the strategies (which fall back to
/// a weaker result), so in practice only the precondition checks and
/// workspace errors reach the caller.
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("Unsupported file type: {file_name}")]
    UnsupportedType { file_name: String },
    #[error("Codec failure: {0}")]
    CodecFailure(String),
    #[error("File too large: {size} bytes (max {limit} bytes)")]
    SizeLimitExceeded { size: u64, limit: u64 },
    #[error("Invalid compression profile: {0}")]
    InvalidProfile(String),
    #[error("Workspace error: {0}")]
    Workspace(#[from] std::io::Error),
}

impl CompressionError {
    pub(crate) fn codec(err: anyhow::Error) -> Self {
        CompressionError::CodecFailure(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
