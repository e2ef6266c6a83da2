//! Error types for format operations

use thiserror::Error;

/// Errors that can occur during format operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the operation
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

/// Errors from encoding or decoding opaque blocks
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid block encoding: {0}")]
    Json(#[from] serde_json::Error),
    #[error("encoded form holds no blocks")]
    Empty,
}

impl From<CodecError> for FormatError {
    fn from(err: CodecError) -> Self {
        FormatError::ParseError(err.to_string())
    }
}
