//! Wide CSV snapshots: one row per security, one column per metric.
//!
//! Recognized columns: `symbol` (or `ticker`), optional `sector`, optional
//! `date`. Every other column is a metric.

use super::{parse_cell, parse_date};
use crate::error::{DataError, Result};
use crate::record::{RawMetricRecord, RejectedRecord, RejectionReason};
use crate::snapshot::UniverseSnapshot;
use chrono::NaiveDate;
use std::fs::File;
use std::io::Read;
use std::path::Path;

struct Layout {
    symbol: usize,
    sector: Option<usize>,
    date: Option<usize>,
    metrics: Vec<(usize, String)>,
    width: usize,
}

impl Layout {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };

        let symbol = find(&["symbol", "ticker"])
            .ok_or_else(|| DataError::MissingColumn("symbol".to_string()))?;
        let sector = find(&["sector"]);
        let date = find(&["date"]);

        let metrics = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != symbol && Some(*i) != sector && Some(*i) != date)
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect();

        Ok(Self {
            symbol,
            sector,
            date,
            metrics,
            width: headers.len(),
        })
    }

    fn parse_row(
        &self,
        row: &csv::StringRecord,
        fallback_date: Option<NaiveDate>,
    ) -> std::result::Result<RawMetricRecord, RejectedRecord> {
        let symbol = row.get(self.symbol).unwrap_or_default().trim().to_string();

        if row.len() != self.width {
            return Err(RejectedRecord::new(
                symbol,
                RejectionReason::Malformed {
                    detail: format!("expected {} fields, found {}", self.width, row.len()),
                },
            ));
        }

        let date = match self.date.and_then(|i| row.get(i)).map(str::trim) {
            Some(raw) if !raw.is_empty() => match parse_date(raw) {
                Some(d) => d,
                None => {
                    return Err(RejectedRecord::new(
                        symbol,
                        RejectionReason::InvalidDate {
                            raw: raw.to_string(),
                        },
                    ));
                }
            },
            _ => match fallback_date {
                Some(d) => d,
                None => {
                    return Err(RejectedRecord::new(
                        symbol,
                        RejectionReason::Malformed {
                            detail: "row has no date".to_string(),
                        },
                    ));
                }
            },
        };

        let mut record = RawMetricRecord::new(symbol, date);
        if let Some(sector) = self.sector.and_then(|i| row.get(i)) {
            record.sector = Some(sector.to_string());
        }

        for (i, name) in &self.metrics {
            let raw = row.get(*i).unwrap_or_default();
            match parse_cell(raw) {
                Ok(value) => {
                    record.metrics.insert(name.clone(), value);
                }
                Err(()) => {
                    return Err(RejectedRecord::new(
                        record.symbol,
                        RejectionReason::NonNumericValue {
                            metric: name.clone(),
                            raw: raw.trim().to_string(),
                        },
                    ));
                }
            }
        }

        Ok(record)
    }
}

/// Read a wide CSV snapshot from any reader.
///
/// When `date` is `None` the scoring date is taken from the first row with a
/// valid `date` cell.
///
/// # Errors
///
/// Returns an error when the input cannot be read, has no symbol column, or no
/// scoring date is available.
pub fn read_csv_snapshot<R: Read>(reader: R, date: Option<NaiveDate>) -> Result<UniverseSnapshot> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let layout = Layout::from_headers(&headers)?;

    let rows: Vec<csv::StringRecord> = rdr.records().collect::<std::result::Result<_, _>>()?;

    let snapshot_date = match date {
        Some(d) => d,
        None => layout
            .date
            .and_then(|i| rows.iter().find_map(|row| row.get(i).and_then(parse_date)))
            .ok_or(DataError::MissingDate)?,
    };

    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();
    for row in &rows {
        match layout.parse_row(row, Some(snapshot_date)) {
            Ok(record) => records.push(record),
            Err(rejection) => rejected.push(rejection),
        }
    }

    tracing::debug!(
        rows = rows.len(),
        metrics = layout.metrics.len(),
        rejected = rejected.len(),
        "parsed CSV snapshot"
    );

    Ok(UniverseSnapshot::with_rejections(
        snapshot_date,
        records,
        rejected,
    ))
}

/// Load a wide CSV snapshot from a file.
///
/// # Errors
///
/// Returns an error when the file cannot be opened or parsed; see
/// [`read_csv_snapshot`].
pub fn load_csv_snapshot(path: &Path, date: Option<NaiveDate>) -> Result<UniverseSnapshot> {
    let file = File::open(path)?;
    read_csv_snapshot(file, date)
}
