//! Career relative-performance engine.
//!
//! Runs in two phases over a finished corpus:
//! - accumulation: every match is filtered, its metric values are turned
//!   into per-career shares and every ordered career pair present gets one
//!   sample (see [`accumulate`])
//! - reconstruction: once all matches are in, shares are scaled back to
//!   absolute numbers with the corpus-wide mean per match and laid out as
//!   career × career matrices (see [`reconstruct`] and [`assemble`])

pub mod accumulate;
pub mod assemble;
pub mod extract;
pub mod filter;
pub mod reconstruct;
pub mod share;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::models::{Faction, MatchCorpus, RelativeReport, Rosters};

use accumulate::{Accumulator, IngestOptions};
use assemble::assemble_matrix;
use extract::MetricExtractor;

/// Errors that stop an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Corpus contains no matches")]
    EmptyCorpus,

    #[error("Match {match_id}: career '{career}' is on neither faction's roster")]
    UnknownCareer { match_id: String, career: String },
}

/// `a / b`, or 0 when `b` is 0.
pub fn div_or_zero(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        0.0
    } else {
        a / b
    }
}

/// Run the accumulation phase over the whole corpus.
pub fn accumulate_corpus(
    corpus: &MatchCorpus,
    rosters: &Rosters,
    config: &AnalysisConfig,
) -> Result<Accumulator, AnalysisError> {
    let metrics = config.effective_metrics();
    let options = IngestOptions {
        role: config.role,
        metrics: &metrics,
        rosters,
        late_join_threshold: config.late_join_threshold,
        extractor: MetricExtractor::new(config.normalize_by_progression),
    };

    if config.parallel {
        let records: Vec<_> = corpus.records().collect();
        records
            .into_par_iter()
            .try_fold(Accumulator::new, |mut acc, record| -> Result<_, AnalysisError> {
                acc.ingest_match(record, &options)?;
                Ok(acc)
            })
            .try_reduce(Accumulator::new, |mut left, right| {
                left.merge(right);
                Ok(left)
            })
    } else {
        let mut acc = Accumulator::new();
        for record in corpus.records() {
            acc.ingest_match(record, &options)?;
        }
        Ok(acc)
    }
}

/// Compute every career matrix of `config` over `corpus`.
pub fn analyze(
    corpus: &MatchCorpus,
    rosters: &Rosters,
    config: &AnalysisConfig,
) -> Result<RelativeReport, AnalysisError> {
    if corpus.is_empty() {
        return Err(AnalysisError::EmptyCorpus);
    }

    let metrics = config.effective_metrics();
    info!(
        "Analyzing {} matches ({} role, metrics: {})",
        corpus.len(),
        config.role,
        metrics
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let accumulator = accumulate_corpus(corpus, rosters, config)?;
    let roster = rosters.for_role(config.role);

    let mut matrices = Vec::with_capacity(Faction::ALL.len() * metrics.len());
    for &metric in &metrics {
        for faction in Faction::ALL {
            if accumulator.total(faction, metric) == 0.0 {
                warn!(
                    "No qualifying {} recorded for {} across the corpus",
                    metric, faction
                );
            }
            matrices.push(assemble_matrix(
                &accumulator,
                roster,
                faction,
                metric,
                config.trim_worst_fraction,
            )?);
        }
    }

    info!(
        "Built {} matrices from {} matches",
        matrices.len(),
        accumulator.matches()
    );

    Ok(RelativeReport::new(
        config.role,
        config.clone(),
        accumulator.matches(),
        matrices,
    ))
}
