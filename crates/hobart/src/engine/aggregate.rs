//! Phase two: metric ranks to sub-component, factor and composite scores.
//!
//! The same renormalizing weighted average is applied at every level, so a
//! security is scored on whatever evidence it has. Nothing here reads another
//! security's data; each security is aggregated independently.

use crate::engine::config::EngineConfig;
use crate::engine::ranking::RankTable;
use hobart_data::RawMetricRecord;
use hobart_factors::{ScoringModel, effective_weights, weighted_average};
use hobart_output::{
    ConfidenceTier, FactorScore, MetricContribution, ScoreRecord, SkipReason, SubComponentScore,
};

/// Aggregate one security.
///
/// `position` is the security's index in the snapshot the table was built
/// from. The returned record has rank 0; ranks are assigned once every
/// security has been aggregated.
pub(crate) fn score_security(
    position: usize,
    record: &RawMetricRecord,
    model: &ScoringModel,
    table: &RankTable,
    config: &EngineConfig,
) -> Result<ScoreRecord, SkipReason> {
    let ranks = table.metrics();
    let sector = record.sector.as_deref();
    let mut metric_index = 0;

    let mut factors = Vec::with_capacity(model.factors.len());
    for factor in &model.factors {
        let mut sub_components = Vec::with_capacity(factor.sub_components.len());

        for sub in &factor.sub_components {
            let mut contributions = Vec::new();
            let mut inputs = Vec::with_capacity(sub.metrics.len());

            for metric in &sub.metrics {
                let metric_ranks = &ranks[metric_index];
                metric_index += 1;

                let rank = metric_ranks.rank(position);
                inputs.push((metric.weight, rank));

                // Only weighted metrics count as used.
                if let Some(rank) = rank.filter(|_| metric.weight > 0.0) {
                    let raw_value = record.value(&metric.name).ok_or_else(|| {
                        SkipReason::AggregationFailure {
                            detail: format!("rank without a value for {}", metric.name),
                        }
                    })?;
                    contributions.push(MetricContribution {
                        name: metric.name.clone(),
                        raw_value,
                        rank,
                        weight: metric.weight,
                        effective_weight: 0.0,
                        basis: metric_ranks.comparison_base(sector),
                    });
                }
            }

            let weights = effective_weights(&inputs);
            for (contribution, weight) in contributions
                .iter_mut()
                .zip(weights.into_iter().flatten())
            {
                contribution.effective_weight = weight;
            }

            sub_components.push(SubComponentScore {
                name: sub.name.clone(),
                score: weighted_average(inputs).map(|s| s.value),
                weight: sub.weight,
                effective_weight: None,
                metrics_defined: sub.metrics.len(),
                metrics: contributions,
            });
        }

        let inputs: Vec<(f64, Option<f64>)> =
            sub_components.iter().map(|s| (s.weight, s.score)).collect();
        for (sub, weight) in sub_components.iter_mut().zip(effective_weights(&inputs)) {
            sub.effective_weight = weight;
        }

        factors.push(FactorScore {
            factor: factor.factor,
            score: weighted_average(inputs).map(|s| s.value),
            weight: factor.weight,
            effective_weight: None,
            sub_components,
        });
    }

    let inputs: Vec<(f64, Option<f64>)> = factors.iter().map(|f| (f.weight, f.score)).collect();
    for (factor, weight) in factors.iter_mut().zip(effective_weights(&inputs)) {
        factor.effective_weight = weight;
    }

    let composite = weighted_average(inputs).ok_or(SkipReason::InsufficientData)?;
    let factors_used = factors.iter().filter(|f| f.score.is_some()).count();
    if factors_used < config.min_factor_count {
        return Err(SkipReason::BelowMinimumFactors {
            available: factors_used,
            required: config.min_factor_count,
        });
    }
    if !composite.value.is_finite() || !(0.0..=100.0).contains(&composite.value) {
        return Err(SkipReason::AggregationFailure {
            detail: format!("composite {} outside [0, 100]", composite.value),
        });
    }

    let metrics_used: usize = factors.iter().map(FactorScore::metrics_used).sum();
    let metrics_defined = model.metric_count();
    let completeness = if metrics_defined == 0 {
        0.0
    } else {
        metrics_used as f64 / metrics_defined as f64
    };

    Ok(ScoreRecord {
        symbol: record.symbol.clone(),
        date: record.date,
        sector: record.sector.clone(),
        composite: composite.value,
        rank: 0,
        confidence: config.confidence(completeness, factors_used, model.factors.len()),
        completeness,
        factors_used,
        metrics_used,
        factors,
    })
}

/// Assign ordinal ranks by composite, best first, ties broken by symbol.
pub(crate) fn assign_ranks(records: &mut [ScoreRecord]) {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by(|&a, &b| {
        records[b]
            .composite
            .total_cmp(&records[a].composite)
            .then_with(|| records[a].symbol.cmp(&records[b].symbol))
    });
    for (rank, index) in order.into_iter().enumerate() {
        records[index].rank = rank + 1;
    }
}

/// Record counts by confidence tier, lowest tier first.
pub(crate) fn tier_counts(records: &[ScoreRecord]) -> [usize; 3] {
    let mut counts = [0; 3];
    for record in records {
        let slot = match record.confidence {
            ConfidenceTier::Low => 0,
            ConfidenceTier::Medium => 1,
            ConfidenceTier::High => 2,
        };
        counts[slot] += 1;
    }
    counts
}
