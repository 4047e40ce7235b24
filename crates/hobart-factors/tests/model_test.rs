//! Integration tests for model loading and the ranking/weighting building blocks.

use approx::assert_relative_eq;
use hobart_factors::{
    Direction, Factor, ModelError, ScoringModel, count_by_factor, percentile_ranks,
    percentile_ranks_with, weighted_average,
};

#[test]
fn test_model_file_round_trip() {
    let path = std::env::temp_dir().join("hobart_model_test.json");
    let mut model = ScoringModel::default_model();
    model.name = "custom".to_string();
    model.min_sector_peers = 5;
    std::fs::write(&path, model.to_json().unwrap()).unwrap();

    let loaded = ScoringModel::from_json_file(&path).unwrap();
    assert_eq!(loaded.name, "custom");
    assert_eq!(loaded.min_sector_peers, 5);
    assert_eq!(loaded.metric_count(), model.metric_count());

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_model_file() {
    let path = std::env::temp_dir().join("hobart_model_that_does_not_exist.json");
    assert!(matches!(
        ScoringModel::from_json_file(&path),
        Err(ModelError::Io(_))
    ));
}

#[test]
fn test_malformed_model_json() {
    assert!(matches!(
        ScoringModel::from_json_str("{\"name\": \"broken\""),
        Err(ModelError::Json(_))
    ));
}

#[test]
fn test_registry_matches_model() {
    let model = ScoringModel::default_model();
    let counts = count_by_factor();
    for factor in Factor::ALL {
        let definition = model.factor(factor).unwrap();
        assert_eq!(counts[&factor], definition.metric_count());
    }
}

fn rank_of(ranks: &[(usize, f64)], id: usize) -> Option<f64> {
    ranks.iter().find(|(k, _)| *k == id).map(|(_, r)| *r)
}

#[test]
fn test_ranks_feed_weighted_average() {
    // Three securities, two metrics with opposite directions.
    let roe = [(0, 0.10), (1, 0.20), (2, 0.30)];
    let leverage = [(0, 2.0), (2, 0.5)];

    let roe_ranks = percentile_ranks(&roe, Direction::HigherIsBetter);
    let leverage_ranks = percentile_ranks(&leverage, Direction::LowerIsBetter);

    // Security 1 has no leverage value: its score is its ROE rank alone.
    let middle = weighted_average([
        (0.5, rank_of(&roe_ranks, 1)),
        (0.5, rank_of(&leverage_ranks, 1)),
    ])
    .unwrap();
    assert_relative_eq!(middle.value, 50.0);
    assert_eq!(middle.used, 1);

    // Security 2 is best on both.
    let best = weighted_average([
        (0.5, rank_of(&roe_ranks, 2)),
        (0.5, rank_of(&leverage_ranks, 2)),
    ])
    .unwrap();
    assert_relative_eq!(best.value, 100.0);
}

#[test]
fn test_single_value_uses_configured_degenerate_rank() {
    let model = ScoringModel {
        degenerate_rank: 45.0,
        ..ScoringModel::default_model()
    };
    model.validate().unwrap();
    let ranks = percentile_ranks_with(
        &[("ONLY", 3.0)],
        Direction::LowerIsBetter,
        model.degenerate_rank,
    );
    assert_eq!(ranks, vec![("ONLY", 45.0)]);
}
