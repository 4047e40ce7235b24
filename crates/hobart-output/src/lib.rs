#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod record;
pub mod report;
pub mod summary;

pub use export::{ExportError, ExportFormat, Exporter, to_dataframe};
pub use record::{
    ComparisonBase, ConfidenceTier, FactorScore, MetricContribution, ScoreRecord, SkipReason,
    SkippedSecurity, SubComponentScore,
};
pub use report::{Report, ReportBuilder, ReportError};
pub use summary::{FactorCoverage, RunSummary, SectorFallback};
