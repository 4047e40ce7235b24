//! Cross-sectional percentile ranking.
//!
//! A value's rank is the share of the other values it beats, with ties
//! counted as half beaten:
//!
//! ```text
//! rank = (beaten + (tied - 1) / 2) / (n - 1) * 100
//! ```
//!
//! `beaten` counts values strictly below (higher-is-better) or strictly above
//! (lower-is-better). Ranks therefore span exactly [0, 100], and a tied group
//! shares the midpoint of the span it occupies. Raw values are ordered as-is;
//! negative values, zeros and outliers are not clipped.

use crate::definition::Direction;

/// Rank given when a metric has a single value and no comparison is possible.
pub const DEFAULT_DEGENERATE_RANK: f64 = 50.0;

/// Percentile ranks of `values`, in input order.
///
/// Inputs are `(key, value)` pairs for securities that have a value; callers
/// leave securities without a value out entirely, and they get no rank.
pub fn percentile_ranks<K: Copy>(values: &[(K, f64)], direction: Direction) -> Vec<(K, f64)> {
    percentile_ranks_with(values, direction, DEFAULT_DEGENERATE_RANK)
}

/// Percentile ranks with an explicit rank for single-value distributions.
pub fn percentile_ranks_with<K: Copy>(
    values: &[(K, f64)],
    direction: Direction,
    degenerate_rank: f64,
) -> Vec<(K, f64)> {
    let n = values.len();
    match n {
        0 => return Vec::new(),
        1 => return vec![(values[0].0, degenerate_rank)],
        _ => {}
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].1.total_cmp(&values[b].1));

    let denominator = (n - 1) as f64;
    let mut ranks = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let value = values[order[start]].1;
        let mut end = start + 1;
        while end < n && values[order[end]].1 == value {
            end += 1;
        }

        let tied = (end - start) as f64;
        let beaten = match direction {
            Direction::HigherIsBetter => start,
            Direction::LowerIsBetter => n - end,
        };
        let rank = (beaten as f64 + (tied - 1.0) / 2.0) / denominator * 100.0;

        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        start = end;
    }

    values
        .iter()
        .zip(ranks)
        .map(|(&(key, _), rank)| (key, rank))
        .collect()
}
