//! Scenario records as delivered by the killboard export.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Career;

/// One row of a scenario scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantEntry {
    pub career: Career,
    pub damage: f64,
    pub healing: f64,
    pub protection: f64,
    pub death_blows: f64,
    pub kill_damage: f64,
    pub renown_rank: f64,
}

impl ParticipantEntry {
    pub fn protection_healing(&self) -> f64 {
        self.protection + self.healing
    }
}

/// A completed scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: String,

    /// Scenario points, indexed by [`Faction::index`](super::Faction::index)
    pub points: [f64; 2],

    pub entries: Vec<ParticipantEntry>,
}

/// All scenarios of one analysis run, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct MatchCorpus {
    matches: BTreeMap<String, MatchRecord>,
}

impl MatchCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it replaced if the id was taken.
    pub fn insert(&mut self, record: MatchRecord) -> Option<MatchRecord> {
        self.matches.insert(record.id.clone(), record)
    }

    pub fn get(&self, id: &str) -> Option<&MatchRecord> {
        self.matches.get(id)
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &MatchRecord> {
        self.matches.values()
    }

    /// Consume the corpus, yielding records in id order.
    pub fn into_records(self) -> impl Iterator<Item = MatchRecord> {
        self.matches.into_values()
    }

    pub fn participant_count(&self) -> usize {
        self.records().map(|r| r.entries.len()).sum()
    }
}

impl FromIterator<MatchRecord> for MatchCorpus {
    fn from_iter<I: IntoIterator<Item = MatchRecord>>(iter: I) -> Self {
        let mut corpus = MatchCorpus::new();
        for record in iter {
            corpus.insert(record);
        }
        corpus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, entries: usize) -> MatchRecord {
        MatchRecord {
            id: id.to_string(),
            points: [500.0, 320.0],
            entries: (0..entries)
                .map(|_| ParticipantEntry {
                    career: Career::from("SLAYER"),
                    damage: 10.0,
                    healing: 0.0,
                    protection: 0.0,
                    death_blows: 0.0,
                    kill_damage: 0.0,
                    renown_rank: 40.0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_corpus_orders_by_id() {
        let corpus: MatchCorpus = vec![record("b", 1), record("a", 2)].into_iter().collect();
        let ids: Vec<_> = corpus.records().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(corpus.participant_count(), 3);
    }

    #[test]
    fn test_into_records_moves_in_id_order() {
        let corpus: MatchCorpus = vec![record("c", 2), record("a", 1)].into_iter().collect();
        let owned: Vec<MatchRecord> = corpus.into_records().collect();
        assert_eq!(owned, vec![record("a", 1), record("c", 2)]);
    }

    #[test]
    fn test_corpus_insert_replaces_duplicate() {
        let mut corpus = MatchCorpus::new();
        assert!(corpus.insert(record("a", 1)).is_none());
        assert!(corpus.insert(record("a", 4)).is_some());
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get("a").unwrap().entries.len(), 4);
    }

    #[test]
    fn test_protection_healing() {
        let mut r = record("a", 1);
        r.entries[0].healing = 120.0;
        r.entries[0].protection = 80.0;
        assert_eq!(r.entries[0].protection_healing(), 200.0);
    }
}
