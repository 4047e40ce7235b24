//! The scoring model: factor, sub-component and metric weights as data.
//!
//! A model is loaded once per run, validated, and never mutated while scores
//! are computed. Adding a metric or reweighting a sub-component is a change to
//! the model, not to the aggregation code.

use crate::definition::{FactorDefinition, MetricDefinition};
use crate::error::ModelError;
use crate::factor::Factor;
use crate::percentile::DEFAULT_DEGENERATE_RANK;
use crate::{growth, momentum, positioning, quality, stability, value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Default minimum number of sector peers for sector-relative ranking.
pub const DEFAULT_MIN_SECTOR_PEERS: usize = 8;

/// A complete, weighted factor model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringModel {
    /// Model name, carried into run summaries.
    pub name: String,

    /// Model version label.
    #[serde(default)]
    pub version: String,

    /// Sector peer groups smaller than this fall back to universe ranking.
    #[serde(default = "default_min_sector_peers")]
    pub min_sector_peers: usize,

    /// Rank assigned when only one security has a value for a metric.
    #[serde(default = "default_degenerate_rank")]
    pub degenerate_rank: f64,

    /// Factor definitions with their composite weights.
    pub factors: Vec<FactorDefinition>,
}

const fn default_min_sector_peers() -> usize {
    DEFAULT_MIN_SECTOR_PEERS
}

const fn default_degenerate_rank() -> f64 {
    DEFAULT_DEGENERATE_RANK
}

/// A metric together with its position in the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricRef<'a> {
    /// Owning factor.
    pub factor: Factor,
    /// Owning sub-component name.
    pub sub_component: &'a str,
    /// The metric definition.
    pub definition: &'a MetricDefinition,
}

impl ScoringModel {
    /// The built-in six-factor model.
    pub fn default_model() -> Self {
        Self {
            name: "hobart-default".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            min_sector_peers: DEFAULT_MIN_SECTOR_PEERS,
            degenerate_rank: DEFAULT_DEGENERATE_RANK,
            factors: vec![
                quality::definition(),
                growth::definition(),
                value::definition(),
                momentum::definition(),
                stability::definition(),
                positioning::definition(),
            ],
        }
    }

    /// Parse and validate a model from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Read, parse and validate a model from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every weight is usable and every name is unique.
    ///
    /// # Errors
    ///
    /// Returns the first problem found. A model that fails validation must not
    /// be used to score anything.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.factors.is_empty() {
            return Err(ModelError::EmptyModel);
        }
        if self.min_sector_peers < 2 {
            return Err(ModelError::InvalidPeerThreshold(self.min_sector_peers));
        }
        if !(0.0..=100.0).contains(&self.degenerate_rank) {
            return Err(ModelError::InvalidDegenerateRank(self.degenerate_rank));
        }

        let mut seen_factors = HashSet::new();
        let mut seen_metrics = HashSet::new();

        for factor in &self.factors {
            if !seen_factors.insert(factor.factor) {
                return Err(ModelError::DuplicateFactor(factor.factor));
            }
            check_weight(factor.weight, || format!("factor {}", factor.factor))?;
            if factor.sub_components.is_empty() {
                return Err(ModelError::EmptyFactor(factor.factor));
            }

            let mut seen_subs = HashSet::new();
            for sub in &factor.sub_components {
                if !seen_subs.insert(sub.name.as_str()) {
                    return Err(ModelError::DuplicateSubComponent {
                        factor: factor.factor,
                        sub_component: sub.name.clone(),
                    });
                }
                check_weight(sub.weight, || {
                    format!("sub-component '{}' of {}", sub.name, factor.factor)
                })?;
                if sub.metrics.is_empty() {
                    return Err(ModelError::EmptySubComponent {
                        factor: factor.factor,
                        sub_component: sub.name.clone(),
                    });
                }

                for metric in &sub.metrics {
                    if metric.name.trim().is_empty() {
                        return Err(ModelError::EmptyMetricName(sub.name.clone()));
                    }
                    if !seen_metrics.insert(metric.name.as_str()) {
                        return Err(ModelError::DuplicateMetric(metric.name.clone()));
                    }
                    check_weight(metric.weight, || format!("metric '{}'", metric.name))?;
                }
            }
        }

        Ok(())
    }

    /// Total number of metrics defined across all factors.
    pub fn metric_count(&self) -> usize {
        self.factors.iter().map(FactorDefinition::metric_count).sum()
    }

    /// Every metric in model order: factor, then sub-component, then metric.
    pub fn metrics(&self) -> impl Iterator<Item = MetricRef<'_>> {
        self.factors.iter().flat_map(|factor| {
            factor.sub_components.iter().flat_map(move |sub| {
                sub.metrics.iter().map(move |definition| MetricRef {
                    factor: factor.factor,
                    sub_component: &sub.name,
                    definition,
                })
            })
        })
    }

    /// Definition of one factor, if the model includes it.
    pub fn factor(&self, factor: Factor) -> Option<&FactorDefinition> {
        self.factors.iter().find(|f| f.factor == factor)
    }

    /// Look up a metric by name.
    pub fn find_metric(&self, name: &str) -> Option<MetricRef<'_>> {
        self.metrics().find(|m| m.definition.name == name)
    }
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self::default_model()
    }
}

fn check_weight(weight: f64, scope: impl FnOnce() -> String) -> Result<(), ModelError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidWeight {
            scope: scope(),
            weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::SubComponentDefinition;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn tiny_model() -> ScoringModel {
        ScoringModel {
            name: "tiny".to_string(),
            version: "1".to_string(),
            min_sector_peers: 3,
            degenerate_rank: 50.0,
            factors: vec![FactorDefinition::new(
                Factor::Quality,
                1.0,
                vec![SubComponentDefinition::new(
                    "profitability",
                    1.0,
                    vec![
                        MetricDefinition::higher("roe", 0.5),
                        MetricDefinition::lower("debt_to_equity", 0.5).sector_relative(),
                    ],
                )],
            )],
        }
    }

    #[test]
    fn test_default_model_is_valid() {
        let model = ScoringModel::default_model();
        model.validate().unwrap();
        assert_eq!(model.factors.len(), 6);
        assert_eq!(model.metric_count(), 63);
        assert_eq!(model.min_sector_peers, DEFAULT_MIN_SECTOR_PEERS);

        let total: f64 = model.factors.iter().map(|f| f.weight).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_default_sub_component_weights_sum_to_one() {
        let model = ScoringModel::default_model();
        for factor in &model.factors {
            let subs: f64 = factor.sub_components.iter().map(|s| s.weight).sum();
            assert_relative_eq!(subs, 1.0, epsilon = 1e-9);
            for sub in &factor.sub_components {
                let metrics: f64 = sub.metrics.iter().map(|m| m.weight).sum();
                assert_relative_eq!(metrics, 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut model = tiny_model();
        model.factors[0].sub_components[0].metrics[0].weight = -0.1;
        assert!(matches!(
            model.validate(),
            Err(ModelError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_nan_weight_rejected() {
        let mut model = tiny_model();
        model.factors[0].weight = f64::NAN;
        assert!(matches!(
            model.validate(),
            Err(ModelError::InvalidWeight { .. })
        ));
    }

    #[rstest]
    #[case::metric(0, 0.0)]
    #[case::sub_component(1, 0.0)]
    #[case::factor(2, 0.0)]
    #[case::negative_zero_factor(2, -0.0)]
    fn test_zero_weight_rejected(#[case] level: usize, #[case] weight: f64) {
        let mut model = tiny_model();
        match level {
            0 => model.factors[0].sub_components[0].metrics[0].weight = weight,
            1 => model.factors[0].sub_components[0].weight = weight,
            _ => model.factors[0].weight = weight,
        }
        assert!(matches!(
            model.validate(),
            Err(ModelError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_structural_errors() {
        let mut model = tiny_model();
        model.factors[0].sub_components[0].metrics.clear();
        assert!(matches!(
            model.validate(),
            Err(ModelError::EmptySubComponent { .. })
        ));

        let mut model = tiny_model();
        let copy = model.factors[0].sub_components[0].metrics[0].clone();
        model.factors[0].sub_components[0].metrics.push(copy);
        assert!(matches!(model.validate(), Err(ModelError::DuplicateMetric(_))));

        let mut model = tiny_model();
        let copy = model.factors[0].clone();
        model.factors.push(copy);
        assert!(matches!(
            model.validate(),
            Err(ModelError::DuplicateFactor(Factor::Quality))
        ));

        let mut model = tiny_model();
        model.factors.clear();
        assert!(matches!(model.validate(), Err(ModelError::EmptyModel)));
    }

    #[test]
    fn test_policy_bounds() {
        let mut model = tiny_model();
        model.min_sector_peers = 1;
        assert!(matches!(
            model.validate(),
            Err(ModelError::InvalidPeerThreshold(1))
        ));

        let mut model = tiny_model();
        model.degenerate_rank = 120.0;
        assert!(matches!(
            model.validate(),
            Err(ModelError::InvalidDegenerateRank(_))
        ));
    }

    #[test]
    fn test_json_round_trip_keeps_structure() {
        let model = ScoringModel::default_model();
        let json = model.to_json().unwrap();
        let parsed = ScoringModel::from_json_str(&json).unwrap();
        assert_eq!(parsed, model);
    }

    #[test]
    fn test_json_defaults_and_validation() {
        let json = r#"{
            "name": "minimal",
            "factors": [{
                "factor": "value",
                "weight": 1.0,
                "sub_components": [{
                    "name": "yield",
                    "weight": 1.0,
                    "metrics": [{"name": "earnings_yield", "weight": 1.0, "direction": "higher_is_better"}]
                }]
            }]
        }"#;
        let model = ScoringModel::from_json_str(json).unwrap();
        assert_eq!(model.min_sector_peers, DEFAULT_MIN_SECTOR_PEERS);
        assert_eq!(model.degenerate_rank, 50.0);

        let invalid = json.replace(
            "\"weight\": 1.0, \"direction\"",
            "\"weight\": -1.0, \"direction\"",
        );
        assert!(matches!(
            ScoringModel::from_json_str(&invalid),
            Err(ModelError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn test_metric_lookup() {
        let model = ScoringModel::default_model();
        let metric = model.find_metric("ev_to_ebitda").unwrap();
        assert_eq!(metric.factor, Factor::Value);
        assert_eq!(metric.sub_component, "cash_flow_valuation");
        assert!(metric.definition.is_sector_relative());
        assert!(model.find_metric("shoe_size").is_none());
        assert_eq!(model.metrics().count(), model.metric_count());
    }
}
