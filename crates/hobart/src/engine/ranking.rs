//! Phase one: percentile ranks for every metric.
//!
//! Each metric is ranked independently, so metrics are spread across the
//! rayon pool. For sector-relative metrics the peer group decision is taken
//! once per (metric, sector) and applied to every security in that sector.

use crate::engine::error::EngineError;
use hobart_data::UniverseSnapshot;
use hobart_factors::{MetricDefinition, ScoringModel, percentile_ranks_with};
use hobart_output::ComparisonBase;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Population a sector's ranks were computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerGroup {
    /// Enough peers: ranked within the sector.
    Sector,
    /// Too few peers: ranked against the whole universe.
    UniverseFallback,
}

/// The peer group decision for one sector-relative metric in one sector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorResolution {
    /// Metric name.
    pub metric: String,

    /// Sector.
    pub sector: String,

    /// Securities in the sector with a value for the metric.
    pub peers: usize,

    /// Resulting peer group.
    pub peer_group: PeerGroup,
}

impl SectorResolution {
    /// Comparison base recorded on every contribution from this sector.
    pub fn comparison_base(&self) -> ComparisonBase {
        match self.peer_group {
            PeerGroup::Sector => ComparisonBase::Sector(self.sector.clone()),
            PeerGroup::UniverseFallback => ComparisonBase::UniverseFallback(self.sector.clone()),
        }
    }
}

/// Ranks of one metric for every security in the snapshot.
#[derive(Debug, Clone)]
pub struct MetricRanks {
    /// Metric name.
    pub metric: String,

    /// Rank by snapshot position; `None` where the security has no value.
    pub ranks: Vec<Option<f64>>,

    /// Peer group decisions by sector. Empty for universe-ranked metrics.
    pub sectors: BTreeMap<String, SectorResolution>,
}

impl MetricRanks {
    /// Rank of the security at `position`.
    pub fn rank(&self, position: usize) -> Option<f64> {
        self.ranks.get(position).copied().flatten()
    }

    /// Comparison base that applies to a security in `sector`.
    pub fn comparison_base(&self, sector: Option<&str>) -> ComparisonBase {
        sector
            .and_then(|s| self.sectors.get(s))
            .map_or(ComparisonBase::Universe, SectorResolution::comparison_base)
    }
}

/// Ranks of every metric in the model, in model order.
#[derive(Debug, Clone)]
pub struct RankTable {
    metrics: Vec<MetricRanks>,
}

impl RankTable {
    /// Rank every metric of `model` across `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] if `cancel` is raised before all
    /// metrics are ranked.
    pub fn build(
        model: &ScoringModel,
        snapshot: &UniverseSnapshot,
        cancel: &AtomicBool,
    ) -> Result<Self, EngineError> {
        let definitions: Vec<&MetricDefinition> = model.metrics().map(|m| m.definition).collect();

        let metrics = definitions
            .par_iter()
            .map(|definition| {
                if cancel.load(Ordering::Relaxed) {
                    return Err(EngineError::Cancelled);
                }
                Ok(rank_metric(definition, model, snapshot))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { metrics })
    }

    /// Ranks in model order.
    pub fn metrics(&self) -> &[MetricRanks] {
        &self.metrics
    }

    /// Ranks of one metric by name.
    pub fn get(&self, metric: &str) -> Option<&MetricRanks> {
        self.metrics.iter().find(|m| m.metric == metric)
    }

    /// Every sector peer group decision, ordered by metric then sector.
    pub fn resolutions(&self) -> impl Iterator<Item = &SectorResolution> {
        self.metrics.iter().flat_map(|m| m.sectors.values())
    }
}

fn rank_metric(
    definition: &MetricDefinition,
    model: &ScoringModel,
    snapshot: &UniverseSnapshot,
) -> MetricRanks {
    let values: Vec<(usize, f64)> = snapshot.metric_values(&definition.name).collect();
    let mut ranks = vec![None; snapshot.len()];

    for (position, rank) in
        percentile_ranks_with(&values, definition.direction, model.degenerate_rank)
    {
        ranks[position] = Some(rank);
    }

    let mut sectors = BTreeMap::new();
    if definition.is_sector_relative() {
        let records = snapshot.records();
        let mut by_sector: BTreeMap<&str, Vec<(usize, f64)>> = BTreeMap::new();
        for &(position, value) in &values {
            if let Some(sector) = records[position].sector.as_deref() {
                by_sector.entry(sector).or_default().push((position, value));
            }
        }

        for (sector, peers) in by_sector {
            let peer_group = if peers.len() >= model.min_sector_peers {
                for (position, rank) in
                    percentile_ranks_with(&peers, definition.direction, model.degenerate_rank)
                {
                    ranks[position] = Some(rank);
                }
                PeerGroup::Sector
            } else {
                tracing::info!(
                    metric = %definition.name,
                    sector,
                    peers = peers.len(),
                    required = model.min_sector_peers,
                    "sector peer group too small, ranking against universe"
                );
                PeerGroup::UniverseFallback
            };

            sectors.insert(
                sector.to_string(),
                SectorResolution {
                    metric: definition.name.clone(),
                    sector: sector.to_string(),
                    peers: peers.len(),
                    peer_group,
                },
            );
        }
    }

    tracing::debug!(
        metric = %definition.name,
        ranked = values.len(),
        sectors = sectors.len(),
        "ranked metric"
    );

    MetricRanks {
        metric: definition.name.clone(),
        ranks,
        sectors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use hobart_data::RawMetricRecord;
    use hobart_factors::{Factor, FactorDefinition, SubComponentDefinition};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    fn model(min_sector_peers: usize) -> ScoringModel {
        ScoringModel {
            name: "ranking".to_string(),
            version: "1".to_string(),
            min_sector_peers,
            degenerate_rank: 50.0,
            factors: vec![FactorDefinition::new(
                Factor::Quality,
                1.0,
                vec![SubComponentDefinition::new(
                    "financial_strength",
                    1.0,
                    vec![
                        MetricDefinition::higher("roe", 0.5),
                        MetricDefinition::lower("debt_to_equity", 0.5).sector_relative(),
                    ],
                )],
            )],
        }
    }

    fn snapshot() -> UniverseSnapshot {
        let rows = [
            ("A", "Energy", Some(0.10), Some(0.5)),
            ("B", "Energy", Some(0.20), Some(1.0)),
            ("C", "Energy", None, Some(1.5)),
            ("D", "Utilities", Some(0.05), Some(2.0)),
            ("E", "Utilities", Some(0.15), None),
        ];
        UniverseSnapshot::new(
            date(),
            rows.into_iter().map(|(symbol, sector, roe, de)| {
                RawMetricRecord::new(symbol, date())
                    .with_sector(sector)
                    .with_metric("roe", roe)
                    .with_metric("debt_to_equity", de)
            }),
        )
    }

    #[test]
    fn test_universe_ranks_skip_missing_values() {
        let table = RankTable::build(&model(2), &snapshot(), &AtomicBool::new(false)).unwrap();
        let roe = table.get("roe").unwrap();
        assert_relative_eq!(roe.rank(0).unwrap(), 100.0 / 3.0, epsilon = 1e-9);
        assert_eq!(roe.rank(1), Some(100.0));
        assert_eq!(roe.rank(2), None);
        assert_eq!(roe.rank(3), Some(0.0));
        assert!(roe.sectors.is_empty());
        assert_eq!(roe.comparison_base(Some("Energy")), ComparisonBase::Universe);
    }

    #[test]
    fn test_sector_relative_with_and_without_fallback() {
        // Energy has three peers with a value, Utilities only one.
        let table = RankTable::build(&model(2), &snapshot(), &AtomicBool::new(false)).unwrap();
        let leverage = table.get("debt_to_equity").unwrap();

        let energy = &leverage.sectors["Energy"];
        assert_eq!(energy.peers, 3);
        assert_eq!(energy.peer_group, PeerGroup::Sector);
        assert_eq!(leverage.rank(0), Some(100.0));
        assert_eq!(leverage.rank(1), Some(50.0));
        assert_eq!(leverage.rank(2), Some(0.0));

        let utilities = &leverage.sectors["Utilities"];
        assert_eq!(utilities.peers, 1);
        assert_eq!(utilities.peer_group, PeerGroup::UniverseFallback);
        // Universe of four values: 2.0 is the worst leverage.
        assert_eq!(leverage.rank(3), Some(0.0));
        assert_eq!(
            leverage.comparison_base(Some("Utilities")),
            ComparisonBase::UniverseFallback("Utilities".to_string())
        );
    }

    #[test]
    fn test_threshold_above_every_sector_falls_back_everywhere() {
        let table = RankTable::build(&model(10), &snapshot(), &AtomicBool::new(false)).unwrap();
        assert!(
            table
                .resolutions()
                .all(|r| r.peer_group == PeerGroup::UniverseFallback)
        );
        let leverage = table.get("debt_to_equity").unwrap();
        // Universe of four: 0.5, 1.0, 1.5, 2.0 (lower is better).
        assert_eq!(leverage.rank(0), Some(100.0));
        assert_relative_eq!(leverage.rank(2).unwrap(), 100.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unclassified_securities_use_universe() {
        let snapshot = UniverseSnapshot::new(
            date(),
            vec![
                RawMetricRecord::new("X", date()).with_metric("debt_to_equity", Some(1.0)),
                RawMetricRecord::new("Y", date())
                    .with_sector("Energy")
                    .with_metric("debt_to_equity", Some(2.0)),
            ],
        );
        let table = RankTable::build(&model(2), &snapshot, &AtomicBool::new(false)).unwrap();
        let leverage = table.get("debt_to_equity").unwrap();
        assert_eq!(leverage.comparison_base(None), ComparisonBase::Universe);
        assert_eq!(leverage.rank(0), Some(100.0));
    }

    #[test]
    fn test_cancelled_before_ranking() {
        let result = RankTable::build(&model(2), &snapshot(), &AtomicBool::new(true));
        assert!(matches!(result, Err(EngineError::Cancelled)));
    }
}
