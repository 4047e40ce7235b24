//! Raw metric records as delivered by the extraction stage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One security's raw metric values for a scoring date.
///
/// A metric mapped to `None` (or not mapped at all) is absent. Absence is an
/// expected state and is never replaced by a default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMetricRecord {
    /// Security identifier.
    pub symbol: String,

    /// Scoring date the values were extracted for.
    pub date: NaiveDate,

    /// Sector classification, if known.
    pub sector: Option<String>,

    /// Metric name to optional value.
    pub metrics: BTreeMap<String, Option<f64>>,
}

impl RawMetricRecord {
    /// Create an empty record for a symbol.
    pub fn new(symbol: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            sector: None,
            metrics: BTreeMap::new(),
        }
    }

    /// Set the sector classification.
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Set a metric value.
    pub fn with_metric(mut self, name: impl Into<String>, value: Option<f64>) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Value of a metric, `None` when absent.
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.metrics.get(metric).copied().flatten()
    }

    /// Number of metrics carrying a value.
    pub fn present_count(&self) -> usize {
        self.metrics.values().filter(|v| v.is_some()).count()
    }

    /// First metric whose value is NaN or infinite.
    pub fn first_non_finite(&self) -> Option<&str> {
        self.metrics
            .iter()
            .find(|(_, v)| v.is_some_and(|x| !x.is_finite()))
            .map(|(name, _)| name.as_str())
    }
}

/// Why an input record was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    /// The record has no symbol.
    #[error("record has an empty symbol")]
    EmptySymbol,

    /// The symbol occurs more than once in the input.
    #[error("duplicate symbol in snapshot")]
    DuplicateSymbol,

    /// The record belongs to a different scoring date.
    #[error("record date {found} does not match snapshot date {expected}")]
    DateMismatch {
        /// Snapshot date.
        expected: NaiveDate,
        /// Date carried by the record.
        found: NaiveDate,
    },

    /// The record's date could not be parsed.
    #[error("unparseable date '{raw}'")]
    InvalidDate {
        /// Raw text.
        raw: String,
    },

    /// A metric cell holds text that is not a number.
    #[error("non-numeric value '{raw}' for metric '{metric}'")]
    NonNumericValue {
        /// Metric name.
        metric: String,
        /// Raw text.
        raw: String,
    },

    /// A metric value is NaN or infinite.
    #[error("non-finite value for metric '{metric}'")]
    NonFiniteValue {
        /// Metric name.
        metric: String,
    },

    /// The row does not match the input layout.
    #[error("malformed row: {detail}")]
    Malformed {
        /// What was wrong.
        detail: String,
    },
}

/// A discarded input record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    /// Symbol of the record, empty when unknown.
    pub symbol: String,

    /// Why it was discarded.
    pub reason: RejectionReason,
}

impl RejectedRecord {
    /// Create a new rejection.
    pub fn new(symbol: impl Into<String>, reason: RejectionReason) -> Self {
        Self {
            symbol: symbol.into(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 29).unwrap()
    }

    #[test]
    fn test_record_builder() {
        let record = RawMetricRecord::new("MSFT", date())
            .with_sector("Information Technology")
            .with_metric("roe", Some(0.38))
            .with_metric("beta", None);

        assert_eq!(record.symbol, "MSFT");
        assert_eq!(record.value("roe"), Some(0.38));
        assert_eq!(record.value("beta"), None);
        assert_eq!(record.value("unknown"), None);
        assert_eq!(record.present_count(), 1);
    }

    #[test]
    fn test_first_non_finite() {
        let record = RawMetricRecord::new("X", date())
            .with_metric("a", Some(1.0))
            .with_metric("b", Some(f64::INFINITY));
        assert_eq!(record.first_non_finite(), Some("b"));

        let clean = RawMetricRecord::new("Y", date()).with_metric("a", Some(-3.5));
        assert_eq!(clean.first_non_finite(), None);
    }

    #[test]
    fn test_rejection_reason_display() {
        let reason = RejectionReason::NonNumericValue {
            metric: "pe_ratio".to_string(),
            raw: "n.m.".to_string(),
        };
        assert_eq!(
            reason.to_string(),
            "non-numeric value 'n.m.' for metric 'pe_ratio'"
        );
    }
}
