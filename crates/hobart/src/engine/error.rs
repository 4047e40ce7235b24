//! Engine errors.

use hobart_factors::ModelError;
use thiserror::Error;

/// Errors that stop a scoring run as a whole.
///
/// Per-security problems never surface here; they become skipped entries.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The scoring model failed validation.
    #[error("Invalid scoring model: {0}")]
    Model(#[from] ModelError),

    /// The engine configuration is unusable.
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// The run was cancelled before it completed.
    #[error("Scoring run cancelled")]
    Cancelled,
}
