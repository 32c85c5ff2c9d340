//! Cross-match accumulation of pairwise shares.
//!
//! The [`Accumulator`] is the only mutable state of a run. It is threaded
//! through every match and can be merged, so shards of a corpus can be
//! accumulated independently and combined before reconstruction.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{AnalysisRole, Career, Faction, MatchRecord, Metric, Rosters};

use super::extract::MetricExtractor;
use super::filter::qualifying_entries;
use super::share::{career_shares, MatchShares};
use super::AnalysisError;

/// Identifies the samples of one ordered career pair for one metric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    pub faction: Faction,
    pub career_x: Career,
    pub career_y: Career,
    pub metric: Metric,
}

impl PairKey {
    pub fn new(faction: Faction, career_x: Career, career_y: Career, metric: Metric) -> Self {
        Self {
            faction,
            career_x,
            career_y,
            metric,
        }
    }
}

/// Per-match shares of a career pair. `own` and `other` always grow together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairSampleSet {
    own: Vec<f64>,
    other: Vec<f64>,
}

impl PairSampleSet {
    pub fn push(&mut self, own: f64, other: f64) {
        self.own.push(own);
        self.other.push(other);
    }

    pub fn own(&self) -> &[f64] {
        &self.own
    }

    pub fn other(&self) -> &[f64] {
        &self.other
    }

    pub fn len(&self) -> usize {
        self.own.len()
    }

    pub fn is_empty(&self) -> bool {
        self.own.is_empty()
    }

    fn append(&mut self, mut other: PairSampleSet) {
        self.own.append(&mut other.own);
        self.other.append(&mut other.other);
    }
}

/// Running state of one analysis pass.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    pairs: BTreeMap<PairKey, PairSampleSet>,
    totals: BTreeMap<(Faction, Metric), f64>,
    matches: usize,
}

/// What a single pass needs to know besides the match itself.
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions<'a> {
    pub role: AnalysisRole,
    pub metrics: &'a [Metric],
    pub rosters: &'a Rosters,
    pub late_join_threshold: f64,
    pub extractor: MetricExtractor,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter, extract, share and pair up one match.
    ///
    /// The match counts towards the corpus size even when nothing in it
    /// qualifies.
    pub fn ingest_match(
        &mut self,
        record: &MatchRecord,
        options: &IngestOptions<'_>,
    ) -> Result<(), AnalysisError> {
        let qualified = qualifying_entries(
            record,
            options.role,
            options.rosters,
            options.late_join_threshold,
        )?;
        self.matches += 1;

        debug!(
            "Match {}: {} of {} entries qualify for {}",
            record.id,
            qualified.len(),
            record.entries.len(),
            options.role
        );

        for faction in Faction::ALL {
            let entries: Vec<_> = qualified.iter().filter(|q| q.faction == faction).collect();

            for &metric in options.metrics {
                let shares = career_shares(
                    entries
                        .iter()
                        .map(|q| (&q.entry.career, options.extractor.extract(q.entry, metric))),
                );
                self.add_shares(faction, metric, &shares);
            }
        }

        Ok(())
    }

    /// Add one match's shares: the raw total goes to the faction total and
    /// every ordered pair of present careers gets one sample.
    pub fn add_shares(&mut self, faction: Faction, metric: Metric, shares: &MatchShares) {
        *self.totals.entry((faction, metric)).or_insert(0.0) += shares.raw_total;

        for (career_x, &share_x) in &shares.shares {
            for (career_y, &share_y) in &shares.shares {
                if career_x == career_y {
                    continue;
                }
                self.pairs
                    .entry(PairKey::new(faction, career_x.clone(), career_y.clone(), metric))
                    .or_default()
                    .push(share_x, share_y);
            }
        }
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: Accumulator) {
        for (key, samples) in other.pairs {
            self.pairs.entry(key).or_default().append(samples);
        }
        for (key, total) in other.totals {
            *self.totals.entry(key).or_insert(0.0) += total;
        }
        self.matches += other.matches;
    }

    pub fn samples(&self, key: &PairKey) -> Option<&PairSampleSet> {
        self.pairs.get(key)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&PairKey, &PairSampleSet)> {
        self.pairs.iter()
    }

    /// Summed metric value of a faction over every match so far.
    pub fn total(&self, faction: Faction, metric: Metric) -> f64 {
        self.totals.get(&(faction, metric)).copied().unwrap_or(0.0)
    }

    pub fn matches(&self) -> usize {
        self.matches
    }
}
