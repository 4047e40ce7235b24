//! Configuration errors.
//!
//! Every variant is fatal for a scoring run: a model with undefined weighting
//! semantics must not produce any scores.

use crate::factor::Factor;
use thiserror::Error;

/// Errors raised while loading or validating a scoring model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The model defines no factors.
    #[error("Model defines no factors")]
    EmptyModel,

    /// A factor appears more than once.
    #[error("Factor {0} is defined more than once")]
    DuplicateFactor(Factor),

    /// A factor has no sub-components.
    #[error("Factor {0} has no sub-components")]
    EmptyFactor(Factor),

    /// A sub-component has no metrics.
    #[error("Sub-component '{sub_component}' of {factor} has no metrics")]
    EmptySubComponent {
        /// Owning factor.
        factor: Factor,
        /// Sub-component name.
        sub_component: String,
    },

    /// A sub-component name is repeated within a factor.
    #[error("Sub-component '{sub_component}' of {factor} is defined more than once")]
    DuplicateSubComponent {
        /// Owning factor.
        factor: Factor,
        /// Sub-component name.
        sub_component: String,
    },

    /// A metric name is blank.
    #[error("Metric with an empty name in sub-component '{0}'")]
    EmptyMetricName(String),

    /// A metric appears in more than one place.
    #[error("Metric '{0}' is defined more than once")]
    DuplicateMetric(String),

    /// A weight is zero, negative, NaN or infinite.
    #[error("Invalid weight {weight} for {scope}")]
    InvalidWeight {
        /// What the weight belongs to.
        scope: String,
        /// The offending weight.
        weight: f64,
    },

    /// The minimum sector peer group size is unusable.
    #[error("Minimum sector peer group size must be at least 2, got {0}")]
    InvalidPeerThreshold(usize),

    /// The degenerate rank is outside [0, 100].
    #[error("Degenerate rank must lie in [0, 100], got {0}")]
    InvalidDegenerateRank(f64),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
