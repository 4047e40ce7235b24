//! Snapshots from polars DataFrames produced by extraction pipelines.

use super::parse_cell;
use crate::error::{DataError, Result};
use crate::record::{RawMetricRecord, RejectedRecord, RejectionReason};
use crate::snapshot::UniverseSnapshot;
use chrono::NaiveDate;
use polars::prelude::*;

/// Columns that never hold metric values.
const RESERVED_COLUMNS: &[&str] = &["symbol", "sector", "date"];

enum MetricColumn {
    Numeric(Float64Chunked),
    Text(StringChunked),
}

impl MetricColumn {
    fn from_column(column: &Column) -> Result<Self> {
        let series = column.as_materialized_series();
        Ok(match series.dtype() {
            DataType::String => Self::Text(series.str()?.clone()),
            _ => Self::Numeric(series.cast(&DataType::Float64)?.f64()?.clone()),
        })
    }

    /// Value at a row; `Err` carries the offending text.
    fn get(&self, row: usize) -> std::result::Result<Option<f64>, String> {
        match self {
            Self::Numeric(values) => Ok(values.get(row)),
            Self::Text(values) => match values.get(row) {
                None => Ok(None),
                Some(raw) => parse_cell(raw).map_err(|()| raw.trim().to_string()),
            },
        }
    }
}

/// Build a snapshot from a wide DataFrame.
///
/// The frame needs a string `symbol` column; a string `sector` column is
/// optional and a `date` column is ignored. Every other column is a metric:
/// numeric columns are cast to `Float64`, string columns are parsed cell by
/// cell so a single unparseable cell rejects only its row.
///
/// # Errors
///
/// Returns an error when the `symbol` column is missing or not a string column.
pub fn snapshot_from_frame(df: &DataFrame, date: NaiveDate) -> Result<UniverseSnapshot> {
    let symbols = df
        .column("symbol")
        .map_err(|_| DataError::MissingColumn("symbol".to_string()))?
        .as_materialized_series()
        .str()?
        .clone();

    let sectors = match df.column("sector") {
        Ok(column) => Some(column.as_materialized_series().str()?.clone()),
        Err(_) => None,
    };

    let mut metrics = Vec::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if RESERVED_COLUMNS.contains(&name) {
            continue;
        }
        metrics.push((name.to_string(), MetricColumn::from_column(column)?));
    }

    let mut records = Vec::with_capacity(df.height());
    let mut rejected = Vec::new();

    'rows: for row in 0..df.height() {
        let symbol = symbols.get(row).unwrap_or_default();
        let mut record = RawMetricRecord::new(symbol, date);
        if let Some(sector) = sectors.as_ref().and_then(|s| s.get(row)) {
            record.sector = Some(sector.to_string());
        }

        for (name, column) in &metrics {
            match column.get(row) {
                Ok(value) => {
                    record.metrics.insert(name.clone(), value);
                }
                Err(raw) => {
                    rejected.push(RejectedRecord::new(
                        symbol,
                        RejectionReason::NonNumericValue {
                            metric: name.clone(),
                            raw,
                        },
                    ));
                    continue 'rows;
                }
            }
        }

        records.push(record);
    }

    Ok(UniverseSnapshot::with_rejections(date, records, rejected))
}
