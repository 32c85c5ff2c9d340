//! # Career Relative
//!
//! Pairwise career relative-performance comparisons from scenario scoreboards.
//!
//! For every ordered pair of careers sharing a faction, the engine measures
//! how a metric (damage, deathblows, healing, ...) splits between them across
//! all scenarios in which both took part, then scales those shares back to
//! absolute reference numbers.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (careers, rosters, match records, matrices)
//! - **calculate**: Filtering, share accumulation and reconstruction
//! - **storage**: Corpus loading and report output (JSON, JSONL)
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;

pub use models::*;
