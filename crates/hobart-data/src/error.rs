//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that make a whole input unusable.
///
/// Problems confined to a single record are not errors at this level; they
/// surface as [`crate::RejectedRecord`] entries on the snapshot instead.
#[derive(Debug, Error)]
pub enum DataError {
    /// CSV reader error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is missing from a tabular input
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Input layout is not one of the supported shapes
    #[error("Unsupported input layout: {0}")]
    UnsupportedLayout(String),

    /// No scoring date was given and none could be inferred from the input
    #[error("Scoring date not provided and not present in the input")]
    MissingDate,

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),
}
