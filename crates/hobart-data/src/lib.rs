#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod loader;
pub mod record;
pub mod sector;
pub mod snapshot;

pub use error::{DataError, Result};
pub use loader::{
    load_csv_snapshot, load_json_snapshot, read_csv_snapshot, read_json_snapshot,
    snapshot_from_frame,
};
pub use record::{RawMetricRecord, RejectedRecord, RejectionReason};
pub use sector::{GicsSector, normalize_sector_label};
pub use snapshot::UniverseSnapshot;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
