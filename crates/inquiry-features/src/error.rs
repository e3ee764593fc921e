//! Error types for feature aggregation.

use thiserror::Error;

/// Result type for feature aggregation.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can occur while building inquiry features.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Half-life is zero, negative or not finite
    #[error("Invalid half-life: {0} (must be a positive, finite number of days)")]
    InvalidHalfLife(f64),

    /// Two half-lives map to the same decay column
    #[error("Duplicate half-life: {0}d")]
    DuplicateHalfLife(i64),

    /// Window month listed more than once
    #[error("Duplicate window month: {0}")]
    DuplicateWindowMonth(u32),

    /// Product group unusable as a column prefix
    #[error("Invalid product group '{label}': {reason}")]
    InvalidProductGroup {
        /// Offending label
        label: String,
        /// Why it was rejected
        reason: String,
    },

    /// Column required by the configuration is absent from the input
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Column exists but has an unusable dtype
    #[error("Column {column} has dtype {dtype}, expected {expected}")]
    InvalidColumnType {
        /// Column name
        column: String,
        /// Actual dtype
        dtype: String,
        /// Description of the accepted dtypes
        expected: &'static str,
    },

    /// Combiner was handed no slices
    #[error("No slices to combine")]
    NoSlices,

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
