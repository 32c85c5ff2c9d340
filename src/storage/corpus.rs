//! Scenario corpus loading.
//!
//! A corpus file is a JSON object mapping scenario id to the killboard's
//! scenario record. Only the fields the engine needs are read; anything
//! missing or mistyped fails the whole load.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::models::{Career, MatchCorpus, MatchRecord, ParticipantEntry};

use super::StorageError;

/// Something that can hand over a finished corpus.
pub trait CorpusSource {
    /// Human-readable origin for logs.
    fn describe(&self) -> String;

    fn load(&self) -> Result<MatchCorpus, StorageError>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMatch {
    points: Vec<f64>,
    scoreboard_entries: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawCharacter {
    career: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    #[serde(default)]
    career: Option<String>,
    #[serde(default)]
    character: Option<RawCharacter>,
    damage: f64,
    healing: f64,
    protection: f64,
    death_blows: f64,
    kill_damage: f64,
    renown_rank: f64,
}

fn malformed(match_id: &str, reason: impl Into<String>) -> StorageError {
    StorageError::MalformedRecord {
        match_id: match_id.to_string(),
        reason: reason.into(),
    }
}

fn convert_match(id: String, raw: RawMatch) -> Result<MatchRecord, StorageError> {
    let points: [f64; 2] = raw.points.as_slice().try_into().map_err(|_| {
        malformed(
            &id,
            format!("expected 2 points values, got {}", raw.points.len()),
        )
    })?;

    let entries = raw
        .scoreboard_entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let career = entry
                .career
                .or(entry.character.map(|c| c.career))
                .ok_or_else(|| malformed(&id, format!("scoreboard entry {} has no career", i)))?;
            Ok(ParticipantEntry {
                career: Career::new(career),
                damage: entry.damage,
                healing: entry.healing,
                protection: entry.protection,
                death_blows: entry.death_blows,
                kill_damage: entry.kill_damage,
                renown_rank: entry.renown_rank,
            })
        })
        .collect::<Result<Vec<_>, StorageError>>()?;

    Ok(MatchRecord {
        id,
        points,
        entries,
    })
}

/// Parse a corpus from JSON text.
pub fn parse_corpus(json: &str) -> Result<MatchCorpus, StorageError> {
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
    let mut corpus = MatchCorpus::new();

    for (id, value) in raw {
        let raw_match: RawMatch =
            serde_json::from_value(value).map_err(|e| malformed(&id, e.to_string()))?;
        corpus.insert(convert_match(id, raw_match)?);
    }

    Ok(corpus)
}

/// A single corpus JSON file.
#[derive(Debug, Clone)]
pub struct JsonCorpusFile {
    pub path: PathBuf,
}

impl JsonCorpusFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CorpusSource for JsonCorpusFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<MatchCorpus, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }
        let contents = fs::read_to_string(&self.path)?;
        let corpus = parse_corpus(&contents)?;
        debug!("Read {} matches from {:?}", corpus.len(), self.path);
        Ok(corpus)
    }
}

/// Every corpus file matching a glob pattern, merged into one corpus.
#[derive(Debug, Clone)]
pub struct JsonCorpusGlob {
    pub pattern: String,
}

impl JsonCorpusGlob {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    fn paths(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut paths = Vec::new();
        for entry in glob::glob(&self.pattern)? {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path: {}", e),
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl CorpusSource for JsonCorpusGlob {
    fn describe(&self) -> String {
        self.pattern.clone()
    }

    fn load(&self) -> Result<MatchCorpus, StorageError> {
        let paths = self.paths()?;
        if paths.is_empty() {
            return Err(StorageError::NoFilesMatched(self.pattern.clone()));
        }

        let mut corpus = MatchCorpus::new();
        for path in &paths {
            let part = JsonCorpusFile::new(path).load()?;
            for record in part.into_records() {
                let id = record.id.clone();
                if corpus.insert(record).is_some() {
                    warn!("Match {} appears in more than one file; keeping {:?}", id, path);
                }
            }
        }

        info!("Merged {} matches from {} files", corpus.len(), paths.len());
        Ok(corpus)
    }
}

/// Pick a source for a path or glob pattern given on the command line.
pub fn corpus_source(location: &str) -> Box<dyn CorpusSource> {
    if location.contains(['*', '?', '[']) {
        Box::new(JsonCorpusGlob::new(location))
    } else {
        Box::new(JsonCorpusFile::new(Path::new(location)))
    }
}
