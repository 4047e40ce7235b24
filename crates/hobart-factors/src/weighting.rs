//! Weighted average over available inputs.
//!
//! The same routine combines metric ranks into a sub-component, sub-components
//! into a factor, and factors into the composite. Missing inputs drop out and
//! the remaining weights are rescaled to sum to one, so a security is judged on
//! the evidence it has rather than penalized for the evidence it lacks.

use serde::{Deserialize, Serialize};

/// Result of a renormalized weighted average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedScore {
    /// The weighted average of the available values.
    pub value: f64,

    /// Number of available inputs that carried positive weight.
    pub used: usize,

    /// Sum of the configured weights of the available inputs.
    pub weight_sum: f64,
}

/// Weighted average of `(weight, value)` pairs, skipping absent values.
///
/// Returns `None` when no input with positive weight has a value.
pub fn weighted_average<I>(inputs: I) -> Option<WeightedScore>
where
    I: IntoIterator<Item = (f64, Option<f64>)>,
{
    let mut weighted = 0.0;
    let mut weight_sum = 0.0;
    let mut used = 0;

    for (weight, value) in inputs {
        if let Some(value) = value
            && weight > 0.0
        {
            weighted += weight * value;
            weight_sum += weight;
            used += 1;
        }
    }

    (weight_sum > 0.0).then(|| WeightedScore {
        value: weighted / weight_sum,
        used,
        weight_sum,
    })
}

/// Renormalized weight of each input: `Some(w / Σw)` for available inputs,
/// `None` for absent ones.
pub fn effective_weights(inputs: &[(f64, Option<f64>)]) -> Vec<Option<f64>> {
    let weight_sum: f64 = inputs
        .iter()
        .filter(|(w, v)| v.is_some() && *w > 0.0)
        .map(|(w, _)| w)
        .sum();

    inputs
        .iter()
        .map(|(w, v)| match v {
            Some(_) if weight_sum > 0.0 => Some(w.max(0.0) / weight_sum),
            _ => None,
        })
        .collect()
}
