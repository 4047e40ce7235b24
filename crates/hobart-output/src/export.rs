//! Export functionality for score runs.
//!
//! CSV output is flat, one row per security with the composite and the six
//! factor scores. JSON output keeps the full nested breakdown. Both are
//! deterministic: the same records always serialize to the same bytes.

use crate::record::{ScoreRecord, SkippedSecurity};
use chrono::NaiveDate;
use hobart_factors::Factor;
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialized output was not valid UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Flat CSV row for one scored security.
#[derive(Debug, Serialize)]
struct ScoreRow<'a> {
    symbol: &'a str,
    date: NaiveDate,
    sector: Option<&'a str>,
    rank: usize,
    composite: f64,
    quality: Option<f64>,
    growth: Option<f64>,
    value: Option<f64>,
    momentum: Option<f64>,
    stability: Option<f64>,
    positioning: Option<f64>,
    factors_used: usize,
    metrics_used: usize,
    completeness: f64,
    confidence: &'a str,
}

impl<'a> From<&'a ScoreRecord> for ScoreRow<'a> {
    fn from(record: &'a ScoreRecord) -> Self {
        Self {
            symbol: &record.symbol,
            date: record.date,
            sector: record.sector.as_deref(),
            rank: record.rank,
            composite: record.composite,
            quality: record.factor_score(Factor::Quality),
            growth: record.factor_score(Factor::Growth),
            value: record.factor_score(Factor::Value),
            momentum: record.factor_score(Factor::Momentum),
            stability: record.factor_score(Factor::Stability),
            positioning: record.factor_score(Factor::Positioning),
            factors_used: record.factors_used,
            metrics_used: record.metrics_used,
            completeness: record.completeness,
            confidence: record.confidence.key(),
        }
    }
}

/// Flat CSV row for one skipped security.
#[derive(Debug, Serialize)]
struct SkippedRow<'a> {
    symbol: &'a str,
    code: &'a str,
    detail: String,
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn csv_to_string<T, I>(rows: I) -> Result<String, ExportError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

impl Exporter for Vec<ScoreRecord> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => csv_to_string(self.iter().map(ScoreRow::from)),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<SkippedSecurity> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => csv_to_string(self.iter().map(|s| SkippedRow {
                symbol: &s.symbol,
                code: s.reason.code(),
                detail: s.reason.to_string(),
            })),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Flat DataFrame of scored securities, one row per record.
///
/// Columns: `symbol`, `date`, `sector`, `rank`, `composite`, one column per
/// factor, `factors_used`, `completeness` and `confidence`.
pub fn to_dataframe(records: &[ScoreRecord]) -> PolarsResult<DataFrame> {
    let mut columns = vec![
        Column::new(
            "symbol".into(),
            records.iter().map(|r| r.symbol.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "date".into(),
            records.iter().map(|r| r.date).collect::<Vec<_>>(),
        ),
        Column::new(
            "sector".into(),
            records.iter().map(|r| r.sector.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            "rank".into(),
            records.iter().map(|r| r.rank as u32).collect::<Vec<_>>(),
        ),
        Column::new(
            "composite".into(),
            records.iter().map(|r| r.composite).collect::<Vec<_>>(),
        ),
    ];

    for factor in Factor::ALL {
        columns.push(Column::new(
            factor.key().into(),
            records
                .iter()
                .map(|r| r.factor_score(factor))
                .collect::<Vec<_>>(),
        ));
    }

    columns.push(Column::new(
        "factors_used".into(),
        records.iter().map(|r| r.factors_used as u32).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "completeness".into(),
        records.iter().map(|r| r.completeness).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "confidence".into(),
        records
            .iter()
            .map(|r| r.confidence.key())
            .collect::<Vec<_>>(),
    ));

    DataFrame::new(columns)
}
