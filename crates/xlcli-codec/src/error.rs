//! Codec error types

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Errors that can occur while encoding or decoding rows
#[derive(Debug, Error)]
pub enum CodecError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON library error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input parsed but does not have the expected layout
    #[error("Unexpected JSON layout: {0}")]
    Shape(String),
}
