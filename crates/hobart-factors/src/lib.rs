#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod definition;
pub mod error;
pub mod factor;
pub mod growth;
pub mod model;
pub mod momentum;
pub mod percentile;
pub mod positioning;
pub mod quality;
pub mod registry;
pub mod stability;
pub mod value;
pub mod weighting;

pub use definition::{
    Direction, FactorDefinition, MetricDefinition, RankingBasis, SubComponentDefinition,
};
pub use error::ModelError;
pub use factor::Factor;
pub use model::{MetricRef, ScoringModel};
pub use percentile::{DEFAULT_DEGENERATE_RANK, percentile_ranks, percentile_ranks_with};
pub use weighting::{WeightedScore, effective_weights, weighted_average};

// Re-export registry types for convenience
pub use registry::{
    MetricInfo, available_metrics, count_by_factor, get_metric_info, metrics_by_factor,
    model_metrics,
};
