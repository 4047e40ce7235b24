//! The result of one scoring run.

use crate::engine::ranking::{PeerGroup, SectorResolution};
use chrono::NaiveDate;
use hobart_output::{
    Report, ReportBuilder, ReportError, RunSummary, ScoreRecord, SectorFallback, SkippedSecurity,
};
use serde::{Deserialize, Serialize};

/// Scores, skips and peer group decisions for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringRun {
    /// Scoring date.
    pub date: NaiveDate,

    /// Name of the model that produced the run.
    pub model: String,

    /// Scored securities, sorted by symbol.
    pub records: Vec<ScoreRecord>,

    /// Skipped securities, sorted by symbol.
    pub skipped: Vec<SkippedSecurity>,

    /// Peer group decision for every (sector-relative metric, sector) pair.
    pub resolutions: Vec<SectorResolution>,
}

impl ScoringRun {
    /// Score record for one symbol.
    pub fn get(&self, symbol: &str) -> Option<&ScoreRecord> {
        self.records
            .binary_search_by(|r| r.symbol.as_str().cmp(symbol))
            .ok()
            .map(|i| &self.records[i])
    }

    /// Skip entry for one symbol.
    pub fn skipped(&self, symbol: &str) -> Option<&SkippedSecurity> {
        self.skipped.iter().find(|s| s.symbol == symbol)
    }

    /// Records ordered best first.
    pub fn ranked(&self) -> Vec<&ScoreRecord> {
        let mut ranked: Vec<&ScoreRecord> = self.records.iter().collect();
        ranked.sort_by_key(|r| r.rank);
        ranked
    }

    /// Sector-relative metrics that fell back to universe ranking.
    pub fn fallbacks(&self) -> Vec<SectorFallback> {
        self.resolutions
            .iter()
            .filter(|r| r.peer_group == PeerGroup::UniverseFallback)
            .map(|r| SectorFallback {
                metric: r.metric.clone(),
                sector: r.sector.clone(),
                peers: r.peers,
            })
            .collect()
    }

    /// Run statistics.
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_run(
            self.model.clone(),
            self.date,
            &self.records,
            &self.skipped,
            self.fallbacks(),
        )
    }

    /// Full JSON report of the run.
    pub fn report(&self) -> Result<Report, ReportError> {
        ReportBuilder::new()
            .summary(self.summary())
            .scores(self.records.clone())
            .skipped(self.skipped.clone())
            .build()
    }
}
