//! Per-match share of a faction's total.

use std::collections::BTreeMap;

use crate::models::Career;

use super::div_or_zero;

/// Shares of one faction in one match for one metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchShares {
    /// Sum of every qualifying value
    pub raw_total: f64,

    /// Sum of the per-career means; the share denominator
    pub career_total: f64,

    /// Careers with at least one qualifying entry
    pub shares: BTreeMap<Career, f64>,
}

impl MatchShares {
    pub fn get(&self, career: &Career) -> Option<f64> {
        self.shares.get(career).copied()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

/// Group values by career, average them, and express each average as a
/// fraction of the sum of averages.
pub fn career_shares<'a, I>(values: I) -> MatchShares
where
    I: IntoIterator<Item = (&'a Career, f64)>,
{
    let mut by_career: BTreeMap<&Career, (f64, usize)> = BTreeMap::new();
    let mut raw_total = 0.0;

    for (career, value) in values {
        let slot = by_career.entry(career).or_insert((0.0, 0));
        slot.0 += value;
        slot.1 += 1;
        raw_total += value;
    }

    let means: Vec<(&Career, f64)> = by_career
        .into_iter()
        .map(|(career, (sum, count))| (career, sum / count as f64))
        .collect();
    let career_total: f64 = means.iter().map(|(_, mean)| mean).sum();

    let shares = means
        .into_iter()
        .map(|(career, mean)| (career.clone(), div_or_zero(mean, career_total)))
        .collect();

    MatchShares {
        raw_total,
        career_total,
        shares,
    }
}
