//! Error types for xlcli-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while operating on a workbook
#[derive(Debug, Error)]
pub enum Error {
    /// A required argument was empty or malformed
    #[error("{0}")]
    InvalidArgument(String),

    /// The workbook or an input file does not exist
    #[error("{what} not found: {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    /// Sheet not found by name
    #[error("Sheet '{0}' not found.")]
    SheetNotFound(String),

    /// A sheet with this name already exists
    #[error("Sheet '{0}' already exists.")]
    Conflict(String),

    /// The operation is not allowed in the workbook's current state
    #[error("{0}")]
    InvalidOperation(String),

    /// Import/export format other than csv or json
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid cell address or range
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// The spreadsheet backend failed to read, write or modify the workbook
    #[error("Spreadsheet error: {0}")]
    Engine(String),

    /// Formula evaluation failed
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV/JSON codec error
    #[error(transparent)]
    Codec(#[from] xlcli_codec::CodecError),
}

impl Error {
    /// Create an invalid-argument error with a message
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Create an invalid-operation error with a message
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        Error::InvalidOperation(msg.into())
    }

    /// The workbook file does not exist
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::NotFound {
            what: "File",
            path: path.into(),
        }
    }

    /// An import source does not exist
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Error::NotFound {
            what: "Input file",
            path: path.into(),
        }
    }

    /// Wrap a backend error message
    pub fn engine(err: impl std::fmt::Display) -> Self {
        Error::Engine(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::file_not_found("book.xlsx").to_string(),
            "File not found: book.xlsx"
        );
        assert_eq!(
            Error::input_not_found("in.csv").to_string(),
            "Input file not found: in.csv"
        );
        assert_eq!(
            Error::SheetNotFound("Data".into()).to_string(),
            "Sheet 'Data' not found."
        );
        assert_eq!(
            Error::UnsupportedFormat("xml".into()).to_string(),
            "Unsupported format: xml"
        );
    }
}
