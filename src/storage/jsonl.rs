//! JSONL (JSON Lines) export.
//!
//! Each line is a valid JSON object representing one entity, which keeps
//! flat cell exports easy to stream into other tools.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use super::StorageError;

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write entities one per line, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let mut writer = BufWriter::new(File::create(&self.path)?);
        for entity in entities {
            serde_json::to_writer(&mut writer, entity)?;
            writeln!(writer)?;
        }
        writer.flush()?;

        info!("Wrote {} lines to {:?}", entities.len(), self.path);
        Ok(entities.len())
    }
}
