//! Static metric, sub-component and factor definitions.

use crate::factor::Factor;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Which end of a metric's distribution is favourable.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Larger raw values rank higher.
    #[display("higher is better")]
    HigherIsBetter,
    /// Smaller raw values rank higher.
    #[display("lower is better")]
    LowerIsBetter,
}

/// Population a metric is ranked against.
///
/// Resolved once per metric per scoring run, never per security.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingBasis {
    /// Rank against every security with a value.
    #[default]
    #[display("universe")]
    Universe,
    /// Rank against sector peers, falling back to the universe when the peer
    /// group is smaller than the model's minimum.
    #[display("sector with fallback")]
    SectorWithFallback,
}

/// One raw metric and how it is ranked and weighted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Metric name, the key used in raw metric records.
    pub name: String,

    /// Weight within the owning sub-component.
    pub weight: f64,

    /// Favourable direction.
    pub direction: Direction,

    /// Ranking population.
    #[serde(default)]
    pub basis: RankingBasis,

    /// Brief description of what the metric measures.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl MetricDefinition {
    /// A metric where larger values are better.
    pub fn higher(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            direction: Direction::HigherIsBetter,
            basis: RankingBasis::Universe,
            description: String::new(),
        }
    }

    /// A metric where smaller values are better.
    pub fn lower(name: impl Into<String>, weight: f64) -> Self {
        Self {
            direction: Direction::LowerIsBetter,
            ..Self::higher(name, weight)
        }
    }

    /// Rank against sector peers instead of the whole universe.
    pub fn sector_relative(mut self) -> Self {
        self.basis = RankingBasis::SectorWithFallback;
        self
    }

    /// Attach a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// True when the metric is ranked within sector peers.
    pub fn is_sector_relative(&self) -> bool {
        self.basis == RankingBasis::SectorWithFallback
    }
}

/// A named group of related metrics within one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubComponentDefinition {
    /// Sub-component name, unique within its factor.
    pub name: String,

    /// Weight within the owning factor.
    pub weight: f64,

    /// Member metrics.
    pub metrics: Vec<MetricDefinition>,
}

impl SubComponentDefinition {
    /// Create a sub-component.
    pub fn new(name: impl Into<String>, weight: f64, metrics: Vec<MetricDefinition>) -> Self {
        Self {
            name: name.into(),
            weight,
            metrics,
        }
    }
}

/// One factor's sub-components and its weight in the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorDefinition {
    /// The factor.
    pub factor: Factor,

    /// Weight within the composite.
    pub weight: f64,

    /// Member sub-components.
    pub sub_components: Vec<SubComponentDefinition>,
}

impl FactorDefinition {
    /// Create a factor definition.
    pub const fn new(
        factor: Factor,
        weight: f64,
        sub_components: Vec<SubComponentDefinition>,
    ) -> Self {
        Self {
            factor,
            weight,
            sub_components,
        }
    }

    /// Number of metrics across all sub-components.
    pub fn metric_count(&self) -> usize {
        self.sub_components.iter().map(|s| s.metrics.len()).sum()
    }
}
