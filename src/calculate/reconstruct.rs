//! Turns accumulated shares back into absolute reference numbers.

use crate::models::{Faction, Metric, RelativeValue};

use super::accumulate::{Accumulator, PairSampleSet};
use super::{div_or_zero, AnalysisError};

/// Number of samples left after dropping the worst `trim_worst_fraction`.
pub fn retained_count(len: usize, trim_worst_fraction: f64) -> usize {
    len - discarded_count(len, trim_worst_fraction)
}

fn discarded_count(len: usize, trim_worst_fraction: f64) -> usize {
    if trim_worst_fraction <= 0.0 {
        return 0;
    }
    ((len as f64 * trim_worst_fraction).floor() as usize).min(len)
}

/// Mean of `samples` after dropping the lowest `trim_worst_fraction` of them.
///
/// `None` when nothing is left to average.
pub fn selective_mean(samples: &[f64], trim_worst_fraction: f64) -> Option<f64> {
    let discard = discarded_count(samples.len(), trim_worst_fraction);
    if discard == 0 {
        return mean(samples);
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    mean(&sorted[discard..])
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Corpus-wide mean of a faction's metric per match. Matches in which the
/// faction had nothing qualifying still count.
pub fn mean_per_match(
    accumulator: &Accumulator,
    faction: Faction,
    metric: Metric,
) -> Result<f64, AnalysisError> {
    if accumulator.matches() == 0 {
        return Err(AnalysisError::EmptyCorpus);
    }
    Ok(accumulator.total(faction, metric) / accumulator.matches() as f64)
}

/// Ratio of two reconstructed values; 0 when `other` is 0.
pub fn ratio(own: f64, other: f64) -> f64 {
    div_or_zero(own, other)
}

/// Absolute own/other values of one career pair.
pub fn reconstruct_pair(
    samples: &PairSampleSet,
    mean_per_match: f64,
    metric: Metric,
    trim_worst_fraction: f64,
) -> Option<RelativeValue> {
    let own_share = selective_mean(samples.own(), trim_worst_fraction)?;
    let other_share = selective_mean(samples.other(), trim_worst_fraction)?;

    let precision = metric.precision();
    let own = precision.round(own_share * mean_per_match);
    let other = precision.round(other_share * mean_per_match);

    Some(RelativeValue {
        own,
        other,
        ratio: ratio(own, other),
        sample_count: retained_count(samples.len(), trim_worst_fraction),
    })
}
