//! Metric Registry
//!
//! Flat view over the metrics of the built-in model. Allows metric lookup by
//! name and listing by factor, for tooling that does not need the nested
//! model structure.

use crate::definition::{Direction, RankingBasis};
use crate::factor::Factor;
use crate::model::ScoringModel;
use std::collections::HashMap;

/// Metric metadata
#[derive(Debug, Clone, PartialEq)]
pub struct MetricInfo {
    /// Metric name (unique identifier)
    pub name: String,
    /// Owning factor
    pub factor: Factor,
    /// Owning sub-component
    pub sub_component: String,
    /// Favourable direction
    pub direction: Direction,
    /// Ranking population
    pub basis: RankingBasis,
    /// Weight within the sub-component
    pub weight: f64,
    /// Brief description of what the metric measures
    pub description: String,
}

/// Metadata for every metric of a model, in model order.
pub fn model_metrics(model: &ScoringModel) -> Vec<MetricInfo> {
    model
        .metrics()
        .map(|m| MetricInfo {
            name: m.definition.name.clone(),
            factor: m.factor,
            sub_component: m.sub_component.to_string(),
            direction: m.definition.direction,
            basis: m.definition.basis,
            weight: m.definition.weight,
            description: m.definition.description.clone(),
        })
        .collect()
}

/// Get all metrics of the built-in model
pub fn available_metrics() -> Vec<MetricInfo> {
    model_metrics(&ScoringModel::default_model())
}

/// Get metrics by factor
pub fn metrics_by_factor(factor: Factor) -> Vec<MetricInfo> {
    available_metrics()
        .into_iter()
        .filter(|m| m.factor == factor)
        .collect()
}

/// Get metric info by name
pub fn get_metric_info(name: &str) -> Option<MetricInfo> {
    available_metrics().into_iter().find(|m| m.name == name)
}

/// Get a map of all metrics indexed by name
pub fn metric_map() -> HashMap<String, MetricInfo> {
    available_metrics()
        .into_iter()
        .map(|m| (m.name.clone(), m))
        .collect()
}

/// List all metric names
pub fn list_metric_names() -> Vec<String> {
    available_metrics().into_iter().map(|m| m.name).collect()
}

/// Count metrics by factor
pub fn count_by_factor() -> HashMap<Factor, usize> {
    let mut counts = HashMap::new();
    for metric in available_metrics() {
        *counts.entry(metric.factor).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_metrics_count() {
        let metrics = available_metrics();
        assert_eq!(metrics.len(), 63);
    }

    #[test]
    fn test_metrics_by_factor() {
        assert_eq!(metrics_by_factor(Factor::Quality).len(), 16);
        assert_eq!(metrics_by_factor(Factor::Growth).len(), 10);
        assert_eq!(metrics_by_factor(Factor::Value).len(), 8);
        assert_eq!(metrics_by_factor(Factor::Momentum).len(), 11);
        assert_eq!(metrics_by_factor(Factor::Stability).len(), 8);
        assert_eq!(metrics_by_factor(Factor::Positioning).len(), 10);
    }

    #[test]
    fn test_get_metric_info() {
        let info = get_metric_info("net_debt_to_ebitda").unwrap();
        assert_eq!(info.factor, Factor::Quality);
        assert_eq!(info.sub_component, "financial_strength");
        assert_eq!(info.direction, Direction::LowerIsBetter);
        assert_eq!(info.basis, RankingBasis::SectorWithFallback);

        assert!(get_metric_info("nonexistent_metric").is_none());
    }

    #[test]
    fn test_metric_map_and_names() {
        let map = metric_map();
        assert_eq!(map.len(), 63);
        assert!(map.contains_key("roe"));
        assert!(map.contains_key("days_to_cover"));

        let names = list_metric_names();
        assert_eq!(names.first().map(String::as_str), Some("roe"));
        assert!(names.iter().any(|n| n == "return_12m_ex_1m"));
    }

    #[test]
    fn test_count_by_factor() {
        let counts = count_by_factor();
        assert_eq!(counts.len(), 6);
        assert_eq!(counts.values().sum::<usize>(), 63);
        assert_eq!(counts.get(&Factor::Stability), Some(&8));
    }

    #[test]
    fn test_all_metrics_described() {
        for metric in available_metrics() {
            assert!(
                !metric.description.is_empty(),
                "Metric {} has no description",
                metric.name
            );
        }
    }
}
