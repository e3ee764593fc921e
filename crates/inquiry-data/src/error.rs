//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while listing or loading inquiry data.
#[derive(Debug, Error)]
pub enum DataError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension has no registered reader
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Requested list position does not exist
    #[error("Index {index} out of range for {len} location(s)")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Number of available locations
        len: usize,
    },

    /// Nothing to load
    #[error("No files found under {bucket}/{prefix}")]
    NoFiles {
        /// Bucket that was listed
        bucket: String,
        /// Key prefix that was listed
        prefix: String,
    },

    /// Location list is empty
    #[error("No locations to load")]
    EmptyLocations,

    /// Column to normalize does not exist
    #[error("Missing column: {0}")]
    MissingColumn(String),
}
