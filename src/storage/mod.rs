//! Filesystem input and output.
//!
//! Handles the two ends of a run:
//! - Scenario corpus files (JSON, one file or a glob of them)
//! - Report output (pretty JSON) and flat cell exports (JSONL)

mod corpus;
mod jsonl;

pub use corpus::*;
pub use jsonl::*;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed match {match_id}: {reason}")]
    MalformedRecord { match_id: String, reason: String },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("No corpus files match {0}")]
    NoFilesMatched(String),
}

/// Write `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;

    info!("Wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_json_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("t4.json");

        write_json(&path, &serde_json::json!({"matches": 3})).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed["matches"], 3);
    }

    #[test]
    fn test_malformed_record_message() {
        let err = StorageError::MalformedRecord {
            match_id: "42".to_string(),
            reason: "missing field `points`".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed match 42: missing field `points`");
    }
}
