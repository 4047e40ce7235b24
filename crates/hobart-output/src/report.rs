//! JSON run reports.

use crate::record::{ScoreRecord, SkippedSecurity};
use crate::summary::RunSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The builder was not given a summary.
    #[error("Report is missing its run summary")]
    MissingSummary,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a scoring run produced, in one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,

    /// Run statistics.
    pub summary: RunSummary,

    /// Scored securities.
    pub scores: Vec<ScoreRecord>,

    /// Skipped securities.
    pub skipped: Vec<SkippedSecurity>,
}

impl Report {
    /// Create a new report stamped with the current time.
    pub fn new(
        summary: RunSummary,
        scores: Vec<ScoreRecord>,
        skipped: Vec<SkippedSecurity>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            summary,
            scores,
            skipped,
        }
    }

    /// Convert report to JSON string.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    summary: Option<RunSummary>,
    scores: Vec<ScoreRecord>,
    skipped: Vec<SkippedSecurity>,
    include_scores: bool,
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self {
            include_scores: true,
            ..Self::default()
        }
    }

    /// Set the run summary.
    pub fn summary(mut self, summary: RunSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Set the scored securities.
    pub fn scores(mut self, scores: Vec<ScoreRecord>) -> Self {
        self.scores = scores;
        self
    }

    /// Set the skipped securities.
    pub fn skipped(mut self, skipped: Vec<SkippedSecurity>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Leave per-security scores out, keeping only the summary and skips.
    pub const fn summary_only(mut self) -> Self {
        self.include_scores = false;
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<Report, ReportError> {
        let summary = self.summary.ok_or(ReportError::MissingSummary)?;
        let scores = if self.include_scores {
            self.scores
        } else {
            Vec::new()
        };
        Ok(Report::new(summary, scores, self.skipped))
    }
}
