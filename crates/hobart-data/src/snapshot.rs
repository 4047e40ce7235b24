//! Universe snapshot: the immutable population scored on one date.

use crate::record::{RawMetricRecord, RejectedRecord, RejectionReason};
use crate::sector::normalize_sector_label;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// All securities being scored on a given date.
///
/// Records are validated on construction and held sorted by symbol, so every
/// traversal of a snapshot is deterministic regardless of input order.
#[derive(Debug, Clone)]
pub struct UniverseSnapshot {
    date: NaiveDate,
    records: Vec<RawMetricRecord>,
    index: HashMap<String, usize>,
    rejected: Vec<RejectedRecord>,
}

impl UniverseSnapshot {
    /// Build a snapshot from raw records, discarding malformed ones.
    pub fn new(date: NaiveDate, records: impl IntoIterator<Item = RawMetricRecord>) -> Self {
        Self::with_rejections(date, records, Vec::new())
    }

    /// Build a snapshot, carrying over rejections that happened while parsing.
    ///
    /// A symbol that occurs more than once, counting records already rejected
    /// while parsing, is ambiguous: every one of its records is rejected.
    pub fn with_rejections(
        date: NaiveDate,
        records: impl IntoIterator<Item = RawMetricRecord>,
        mut rejected: Vec<RejectedRecord>,
    ) -> Self {
        let mut records: Vec<RawMetricRecord> = records.into_iter().collect();
        for record in &mut records {
            record.symbol = record.symbol.trim().to_string();
        }

        let mut occurrences: HashMap<String, usize> = HashMap::new();
        let symbols = records
            .iter()
            .map(|r| r.symbol.as_str())
            .chain(rejected.iter().map(|r| r.symbol.trim()));
        for symbol in symbols.filter(|s| !s.is_empty()) {
            *occurrences.entry(symbol.to_string()).or_insert(0) += 1;
        }

        let mut accepted: BTreeMap<String, RawMetricRecord> = BTreeMap::new();
        for mut record in records {
            let reason = if record.symbol.is_empty() {
                Some(RejectionReason::EmptySymbol)
            } else if occurrences.get(&record.symbol).is_some_and(|&n| n > 1) {
                Some(RejectionReason::DuplicateSymbol)
            } else if record.date != date {
                Some(RejectionReason::DateMismatch {
                    expected: date,
                    found: record.date,
                })
            } else if let Some(metric) = record.first_non_finite() {
                Some(RejectionReason::NonFiniteValue {
                    metric: metric.to_string(),
                })
            } else {
                None
            };

            if let Some(reason) = reason {
                rejected.push(RejectedRecord::new(record.symbol, reason));
                continue;
            }

            record.sector = record.sector.as_deref().and_then(normalize_sector_label);
            accepted.insert(record.symbol.clone(), record);
        }

        for rejection in &rejected {
            tracing::warn!(
                symbol = %rejection.symbol,
                reason = %rejection.reason,
                "discarding input record"
            );
        }

        let records: Vec<RawMetricRecord> = accepted.into_values().collect();
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.symbol.clone(), i))
            .collect();

        Self {
            date,
            records,
            index,
            rejected,
        }
    }

    /// Scoring date.
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Accepted records, sorted by symbol.
    pub fn records(&self) -> &[RawMetricRecord] {
        &self.records
    }

    /// Records discarded as malformed.
    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    /// Number of accepted securities.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no record was accepted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by symbol.
    pub fn get(&self, symbol: &str) -> Option<&RawMetricRecord> {
        self.index.get(symbol).map(|&i| &self.records[i])
    }

    /// Position of a symbol in [`Self::records`].
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.index.get(symbol).copied()
    }

    /// Every metric name appearing in at least one record.
    pub fn metric_names(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .flat_map(|r| r.metrics.keys().map(String::as_str))
            .collect()
    }

    /// Number of securities per sector label; unclassified securities are not counted.
    pub fn sector_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for sector in self.records.iter().filter_map(|r| r.sector.as_deref()) {
            *counts.entry(sector).or_insert(0) += 1;
        }
        counts
    }

    /// Non-null values of one metric as `(record position, value)` pairs.
    pub fn metric_values<'a>(&'a self, metric: &'a str) -> impl Iterator<Item = (usize, f64)> + 'a {
        self.records
            .iter()
            .enumerate()
            .filter_map(move |(i, r)| r.value(metric).map(|v| (i, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    #[test]
    fn test_records_sorted_by_symbol() {
        let snapshot = UniverseSnapshot::new(
            date(),
            vec![
                RawMetricRecord::new("MSFT", date()),
                RawMetricRecord::new("AAPL", date()),
                RawMetricRecord::new("GOOGL", date()),
            ],
        );

        let symbols: Vec<&str> = snapshot.records().iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "GOOGL", "MSFT"]);
        assert_eq!(snapshot.position("MSFT"), Some(2));
    }

    #[test]
    fn test_duplicate_symbol_rejects_every_record() {
        let snapshot = UniverseSnapshot::new(
            date(),
            vec![
                RawMetricRecord::new("AAPL", date()).with_metric("roe", Some(1.0)),
                RawMetricRecord::new("MSFT", date()).with_metric("roe", Some(3.0)),
                RawMetricRecord::new("AAPL", date()).with_metric("roe", Some(2.0)),
            ],
        );

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get("AAPL").is_none());
        assert!(snapshot.get("MSFT").is_some());
        assert_eq!(snapshot.rejected().len(), 2);
        assert!(
            snapshot
                .rejected()
                .iter()
                .all(|r| r.symbol == "AAPL" && r.reason == RejectionReason::DuplicateSymbol)
        );
    }

    #[test]
    fn test_symbol_rejected_while_parsing_is_not_accepted() {
        let snapshot = UniverseSnapshot::with_rejections(
            date(),
            vec![RawMetricRecord::new("XOM", date()).with_metric("roe", Some(1.0))],
            vec![RejectedRecord::new(
                "XOM",
                RejectionReason::NonNumericValue {
                    metric: "roe".to_string(),
                    raw: "n/a?".to_string(),
                },
            )],
        );

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.rejected().len(), 2);
        assert_eq!(snapshot.rejected()[1].reason, RejectionReason::DuplicateSymbol);
    }

    #[test]
    fn test_malformed_records_rejected() {
        let other = NaiveDate::from_ymd_opt(2024, 6, 27).unwrap();
        let snapshot = UniverseSnapshot::new(
            date(),
            vec![
                RawMetricRecord::new("  ", date()),
                RawMetricRecord::new("OLD", other),
                RawMetricRecord::new("NAN", date()).with_metric("roe", Some(f64::NAN)),
                RawMetricRecord::new("OK", date()).with_metric("roe", Some(0.1)),
            ],
        );

        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.get("OK").is_some());

        let reasons: Vec<&RejectionReason> =
            snapshot.rejected().iter().map(|r| &r.reason).collect();
        assert_eq!(reasons[0], &RejectionReason::EmptySymbol);
        assert!(matches!(reasons[1], RejectionReason::DateMismatch { .. }));
        assert_eq!(
            reasons[2],
            &RejectionReason::NonFiniteValue {
                metric: "roe".to_string()
            }
        );
    }

    #[test]
    fn test_sector_labels_normalized() {
        let snapshot = UniverseSnapshot::new(
            date(),
            vec![
                RawMetricRecord::new("AAPL", date()).with_sector("Technology"),
                RawMetricRecord::new("MSFT", date()).with_sector("Information Technology"),
                RawMetricRecord::new("SPAC", date()).with_sector(""),
            ],
        );

        let counts = snapshot.sector_counts();
        assert_eq!(counts.get("Information Technology"), Some(&2));
        assert_eq!(counts.len(), 1);
        assert!(snapshot.get("SPAC").unwrap().sector.is_none());
    }

    #[test]
    fn test_metric_values_skip_nulls() {
        let snapshot = UniverseSnapshot::new(
            date(),
            vec![
                RawMetricRecord::new("A", date()).with_metric("m", Some(1.0)),
                RawMetricRecord::new("B", date()).with_metric("m", None),
                RawMetricRecord::new("C", date()).with_metric("m", Some(3.0)),
            ],
        );

        let values: Vec<(usize, f64)> = snapshot.metric_values("m").collect();
        assert_eq!(values, vec![(0, 1.0), (2, 3.0)]);
        assert_eq!(snapshot.metric_names().into_iter().collect::<Vec<_>>(), vec!["m"]);
    }
}
