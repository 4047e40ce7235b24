//! JSON snapshots.
//!
//! Two layouts are accepted:
//!
//! ```json
//! [{"symbol": "AAPL", "sector": "Technology", "metrics": {"roe": 1.47, "beta": null}}]
//! ```
//!
//! or an envelope carrying the scoring date:
//!
//! ```json
//! {"date": "2024-06-28", "records": [ ... ]}
//! ```
//!
//! Records may also carry their own `date`. Metric values must be numbers or
//! `null`; any other JSON value rejects the record.

use super::parse_date;
use crate::error::{DataError, Result};
use crate::record::{RawMetricRecord, RejectedRecord, RejectionReason};
use crate::snapshot::UniverseSnapshot;
use chrono::NaiveDate;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

fn split_document(document: Value) -> Result<(Option<NaiveDate>, Vec<Value>)> {
    match document {
        Value::Array(items) => Ok((None, items)),
        Value::Object(mut map) => {
            let date = match map.remove("date") {
                Some(Value::String(raw)) => Some(parse_date(&raw).ok_or_else(|| {
                    DataError::Parse(format!("invalid snapshot date '{}'", raw))
                })?),
                Some(Value::Null) | None => None,
                Some(other) => {
                    return Err(DataError::Parse(format!(
                        "snapshot date must be a string, found {}",
                        other
                    )));
                }
            };
            match map.remove("records") {
                Some(Value::Array(items)) => Ok((date, items)),
                _ => Err(DataError::UnsupportedLayout(
                    "object input must contain a 'records' array".to_string(),
                )),
            }
        }
        _ => Err(DataError::UnsupportedLayout(
            "expected an array of records or an object with 'records'".to_string(),
        )),
    }
}

fn record_date(item: &Value) -> Option<NaiveDate> {
    item.get("date").and_then(Value::as_str).and_then(parse_date)
}

fn parse_record(
    item: &Value,
    fallback_date: NaiveDate,
) -> std::result::Result<RawMetricRecord, RejectedRecord> {
    let malformed = |symbol: &str, detail: &str| {
        RejectedRecord::new(
            symbol,
            RejectionReason::Malformed {
                detail: detail.to_string(),
            },
        )
    };

    let Some(object) = item.as_object() else {
        return Err(malformed("", "record is not a JSON object"));
    };

    let symbol = match object.get("symbol") {
        Some(Value::String(s)) => s.clone(),
        _ => return Err(malformed("", "record has no string 'symbol'")),
    };

    let date = match object.get("date") {
        None | Some(Value::Null) => fallback_date,
        Some(Value::String(raw)) => parse_date(raw).ok_or_else(|| {
            RejectedRecord::new(
                symbol.as_str(),
                RejectionReason::InvalidDate { raw: raw.clone() },
            )
        })?,
        Some(_) => return Err(malformed(&symbol, "'date' must be a string")),
    };

    let mut record = RawMetricRecord::new(symbol.as_str(), date);

    match object.get("sector") {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => record.sector = Some(s.clone()),
        Some(_) => return Err(malformed(&symbol, "'sector' must be a string")),
    }

    match object.get("metrics") {
        None | Some(Value::Null) => {}
        Some(Value::Object(metrics)) => {
            for (name, value) in metrics {
                let parsed = match value {
                    Value::Null => None,
                    Value::Number(n) => n.as_f64(),
                    other => {
                        return Err(RejectedRecord::new(
                            symbol.as_str(),
                            RejectionReason::NonNumericValue {
                                metric: name.clone(),
                                raw: other.to_string(),
                            },
                        ));
                    }
                };
                record.metrics.insert(name.clone(), parsed);
            }
        }
        Some(_) => return Err(malformed(&symbol, "'metrics' must be an object")),
    }

    Ok(record)
}

/// Read a JSON snapshot from any reader.
///
/// The scoring date is, in order of precedence: `date`, the envelope's
/// `date`, the first record's `date`.
///
/// # Errors
///
/// Returns an error when the document is not valid JSON, has an unsupported
/// layout, or no scoring date is available.
pub fn read_json_snapshot<R: Read>(reader: R, date: Option<NaiveDate>) -> Result<UniverseSnapshot> {
    let document: Value = serde_json::from_reader(reader)?;
    let (envelope_date, items) = split_document(document)?;

    let snapshot_date = date
        .or(envelope_date)
        .or_else(|| items.iter().find_map(record_date))
        .ok_or(DataError::MissingDate)?;

    let mut records = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    for item in &items {
        match parse_record(item, snapshot_date) {
            Ok(record) => records.push(record),
            Err(rejection) => rejected.push(rejection),
        }
    }

    tracing::debug!(
        records = items.len(),
        rejected = rejected.len(),
        "parsed JSON snapshot"
    );

    Ok(UniverseSnapshot::with_rejections(
        snapshot_date,
        records,
        rejected,
    ))
}

/// Load a JSON snapshot from a file.
///
/// # Errors
///
/// Returns an error when the file cannot be opened or parsed; see
/// [`read_json_snapshot`].
pub fn load_json_snapshot(path: &Path, date: Option<NaiveDate>) -> Result<UniverseSnapshot> {
    let file = File::open(path)?;
    read_json_snapshot(BufReader::new(file), date)
}
