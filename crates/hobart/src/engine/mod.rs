//! Scoring engine
//!
//! A run has two phases over an immutable [`UniverseSnapshot`]:
//!
//! 1. rank every metric, in parallel across metrics ([`RankTable`]);
//! 2. aggregate every security, in parallel across securities.
//!
//! Phase two starts only after phase one has finished for every metric,
//! since aggregation reads ranks computed over the whole universe. A failure
//! for one security skips that security and never aborts the run.

mod aggregate;
pub mod config;
pub mod error;
pub mod ranking;
pub mod run;

pub use config::EngineConfig;
pub use error::EngineError;
pub use ranking::{MetricRanks, PeerGroup, RankTable, SectorResolution};
pub use run::ScoringRun;

use hobart_data::UniverseSnapshot;
use hobart_factors::ScoringModel;
use hobart_output::{ScoreRecord, SkipReason, SkippedSecurity};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// A validated model and configuration, ready to score snapshots.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    model: ScoringModel,
    config: EngineConfig,
}

impl ScoringEngine {
    /// Validate `model` and `config` and build an engine.
    ///
    /// # Errors
    ///
    /// Returns an error if either fails validation; no scores can be produced
    /// from an invalid model.
    pub fn new(model: ScoringModel, config: EngineConfig) -> Result<Self, EngineError> {
        model.validate()?;
        config.validate(model.factors.len())?;
        Ok(Self { model, config })
    }

    /// Engine with the built-in model and default configuration.
    pub fn with_default_model() -> Result<Self, EngineError> {
        Self::new(ScoringModel::default_model(), EngineConfig::default())
    }

    /// The scoring model.
    pub const fn model(&self) -> &ScoringModel {
        &self.model
    }

    /// The engine configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score a snapshot.
    pub fn run(&self, snapshot: &UniverseSnapshot) -> Result<ScoringRun, EngineError> {
        self.run_with_cancel(snapshot, &AtomicBool::new(false))
    }

    /// Score a snapshot, stopping early once `cancel` is raised.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] if the flag is observed. Nothing is
    /// kept from a cancelled run; rerunning on the same snapshot reproduces it.
    pub fn run_with_cancel(
        &self,
        snapshot: &UniverseSnapshot,
        cancel: &AtomicBool,
    ) -> Result<ScoringRun, EngineError> {
        let started = Instant::now();
        tracing::info!(
            date = %snapshot.date(),
            model = %self.model.name,
            securities = snapshot.len(),
            metrics = self.model.metric_count(),
            "starting scoring run"
        );

        let table = RankTable::build(&self.model, snapshot, cancel)?;
        tracing::debug!(elapsed = ?started.elapsed(), "ranking complete");

        let outcomes = snapshot
            .records()
            .par_iter()
            .enumerate()
            .map(|(position, record)| {
                if cancel.load(Ordering::Relaxed) {
                    return Err(EngineError::Cancelled);
                }
                Ok(aggregate::score_security(
                    position,
                    record,
                    &self.model,
                    &table,
                    &self.config,
                )
                .map_err(|reason| SkippedSecurity::new(record.symbol.clone(), reason)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut records: Vec<ScoreRecord> = Vec::with_capacity(outcomes.len());
        let mut skipped: Vec<SkippedSecurity> = snapshot
            .rejected()
            .iter()
            .map(|r| {
                SkippedSecurity::new(
                    r.symbol.clone(),
                    SkipReason::MalformedInput {
                        detail: r.reason.to_string(),
                    },
                )
            })
            .collect();

        for outcome in outcomes {
            match outcome {
                Ok(record) => records.push(record),
                Err(entry) => {
                    if let SkipReason::AggregationFailure { detail } = &entry.reason {
                        tracing::warn!(symbol = %entry.symbol, %detail, "aggregation failed");
                    } else {
                        tracing::debug!(symbol = %entry.symbol, reason = %entry.reason, "skipped");
                    }
                    skipped.push(entry);
                }
            }
        }
        skipped.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        // One entry per symbol; a duplicated symbol rejects several records.
        skipped.dedup_by(|a, b| a.symbol == b.symbol);

        aggregate::assign_ranks(&mut records);
        let [low, medium, high] = aggregate::tier_counts(&records);
        let resolutions: Vec<SectorResolution> = table.resolutions().cloned().collect();

        tracing::info!(
            scored = records.len(),
            skipped = skipped.len(),
            high,
            medium,
            low,
            fallbacks = resolutions
                .iter()
                .filter(|r| r.peer_group == PeerGroup::UniverseFallback)
                .count(),
            elapsed = ?started.elapsed(),
            "scoring run complete"
        );

        Ok(ScoringRun {
            date: snapshot.date(),
            model: self.model.name.clone(),
            records,
            skipped,
            resolutions,
        })
    }
}
