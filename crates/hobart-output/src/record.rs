//! Score records and skipped securities.
//!
//! A [`ScoreRecord`] carries everything needed to audit a composite: each
//! factor's score and weights, each sub-component's score, and each metric's
//! raw value, percentile rank and the population it was ranked against.

use chrono::NaiveDate;
use hobart_factors::Factor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Population a metric rank was actually computed against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "sector", rename_all = "snake_case")]
pub enum ComparisonBase {
    /// Ranked against the whole universe.
    Universe,
    /// Ranked against peers in the named sector.
    Sector(String),
    /// Sector-relative metric whose peer group in the named sector was too
    /// small, ranked against the whole universe instead.
    UniverseFallback(String),
}

impl ComparisonBase {
    /// True when a sector-relative metric fell back to the universe.
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::UniverseFallback(_))
    }
}

impl fmt::Display for ComparisonBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universe => write!(f, "universe"),
            Self::Sector(sector) => write!(f, "sector:{sector}"),
            Self::UniverseFallback(sector) => write!(f, "universe (fallback from {sector})"),
        }
    }
}

/// How far a composite can be trusted, from the share of data behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// Sparse data; display with caution.
    Low,
    /// Partial data.
    Medium,
    /// Broad data across every factor.
    High,
}

impl ConfidenceTier {
    /// All tiers, lowest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Stable snake_case identifier.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One metric's part in a sub-component score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricContribution {
    /// Metric name.
    pub name: String,

    /// Raw input value.
    pub raw_value: f64,

    /// Percentile rank in [0, 100].
    pub rank: f64,

    /// Configured weight within the sub-component.
    pub weight: f64,

    /// Weight after renormalization over the available metrics.
    pub effective_weight: f64,

    /// Population the rank was computed against.
    pub basis: ComparisonBase,
}

/// One sub-component's score within a factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubComponentScore {
    /// Sub-component name.
    pub name: String,

    /// Score in [0, 100]; `None` when none of its metrics were available.
    pub score: Option<f64>,

    /// Configured weight within the factor.
    pub weight: f64,

    /// Weight after renormalization over the available sub-components.
    pub effective_weight: Option<f64>,

    /// Number of metrics defined for the sub-component.
    pub metrics_defined: usize,

    /// Contributing metrics, in model order.
    pub metrics: Vec<MetricContribution>,
}

impl SubComponentScore {
    /// Number of metrics that contributed.
    pub fn metrics_used(&self) -> usize {
        self.metrics.len()
    }
}

/// One factor's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    /// The factor.
    pub factor: Factor,

    /// Score in [0, 100]; `None` only when none of its sub-components had data.
    pub score: Option<f64>,

    /// Configured weight within the composite.
    pub weight: f64,

    /// Weight after renormalization over the available factors.
    pub effective_weight: Option<f64>,

    /// Sub-component scores, in model order.
    pub sub_components: Vec<SubComponentScore>,
}

impl FactorScore {
    /// Number of leaf metrics that contributed to this factor.
    pub fn metrics_used(&self) -> usize {
        self.sub_components.iter().map(SubComponentScore::metrics_used).sum()
    }

    /// Number of leaf metrics defined for this factor.
    pub fn metrics_defined(&self) -> usize {
        self.sub_components.iter().map(|s| s.metrics_defined).sum()
    }
}

/// Scores for one security on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Security symbol.
    pub symbol: String,

    /// Scoring date.
    pub date: NaiveDate,

    /// Normalized sector, if classified.
    pub sector: Option<String>,

    /// Composite score in [0, 100].
    pub composite: f64,

    /// Position by composite within the run, 1 being the best.
    pub rank: usize,

    /// Confidence tier derived from completeness and factor coverage.
    pub confidence: ConfidenceTier,

    /// Leaf metrics used over leaf metrics defined in the model, in [0, 1].
    pub completeness: f64,

    /// Number of factors with a score.
    pub factors_used: usize,

    /// Number of leaf metrics used.
    pub metrics_used: usize,

    /// Factor breakdown, in model order.
    pub factors: Vec<FactorScore>,
}

impl ScoreRecord {
    /// Score of one factor, if the model defines it and it had data.
    pub fn factor_score(&self, factor: Factor) -> Option<f64> {
        self.factors
            .iter()
            .find(|f| f.factor == factor)
            .and_then(|f| f.score)
    }

    /// Iterate over every contributing metric with its factor and sub-component.
    pub fn contributions(&self) -> impl Iterator<Item = (Factor, &str, &MetricContribution)> {
        self.factors.iter().flat_map(|factor| {
            factor.sub_components.iter().flat_map(move |sub| {
                sub.metrics
                    .iter()
                    .map(move |metric| (factor.factor, sub.name.as_str(), metric))
            })
        })
    }

    /// Look up one metric's contribution by name.
    pub fn metric(&self, name: &str) -> Option<&MetricContribution> {
        self.contributions()
            .map(|(_, _, metric)| metric)
            .find(|metric| metric.name == name)
    }
}

/// Why a security received no score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum SkipReason {
    /// No usable metric in any factor.
    InsufficientData,

    /// The input record was discarded before scoring.
    MalformedInput {
        /// What was wrong with the record.
        detail: String,
    },

    /// Aggregation failed for this security alone.
    AggregationFailure {
        /// What went wrong.
        detail: String,
    },

    /// Fewer factors had data than the configured minimum.
    BelowMinimumFactors {
        /// Factors with data.
        available: usize,
        /// Configured minimum.
        required: usize,
    },
}

impl SkipReason {
    /// Stable reason code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InsufficientData => "insufficient_data",
            Self::MalformedInput { .. } => "malformed_input",
            Self::AggregationFailure { .. } => "aggregation_failure",
            Self::BelowMinimumFactors { .. } => "below_minimum_factors",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData => write!(f, "no usable metrics in any factor"),
            Self::MalformedInput { detail } => write!(f, "malformed input: {detail}"),
            Self::AggregationFailure { detail } => write!(f, "aggregation failed: {detail}"),
            Self::BelowMinimumFactors {
                available,
                required,
            } => write!(f, "{available} factor(s) with data, {required} required"),
        }
    }
}

/// A security left out of the scored output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSecurity {
    /// Security symbol.
    pub symbol: String,

    /// Why it was skipped.
    pub reason: SkipReason,
}

impl SkippedSecurity {
    /// Create a skipped entry.
    pub fn new(symbol: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            symbol: symbol.into(),
            reason,
        }
    }
}
