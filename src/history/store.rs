//! Flat-file history store.
//!
//! All entries live in one JSON array. Every mutation is a read-modify-write
//! cycle serialized by `lock`; the new array is written to a temporary file
//! next to the history file and renamed over it. Processes sharing the file
//! are not coordinated.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use thiserror::Error;

use super::models::{DeleteOutcome, HistoryEntry};
use crate::document::naming::is_plain_file_name;
use crate::document::FileSlot;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to read history file: {0}")]
    Read(#[source] std::io::Error),
    #[error("failed to serialize history: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write history file: {0}")]
    Write(#[source] std::io::Error),
}

pub struct HistoryStore {
    path: PathBuf,
    files_dir: PathBuf,
    lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>, files_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            files_dir: files_dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        info!("Recording history entry {} ({})", entry.id, entry.topic);
        entries.push(entry);
        self.save(&entries)
    }

    /// Entries in file order.
    pub fn list_all(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let _guard = self.lock.lock();
        self.load()
    }

    pub fn list_newest_first(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = self.list_all()?;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    /// Remove the entry and every file it references.
    pub fn delete(&self, id: &str) -> Result<DeleteOutcome, HistoryError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;

        let Some(position) = entries.iter().position(|entry| entry.id == id) else {
            debug!("History entry {} not found", id);
            return Ok(DeleteOutcome::NotFound);
        };
        let entry = entries.remove(position);

        // persist the removal before touching any file
        self.save(&entries)?;

        let mut removed_files = 0;
        for slot in entry.files.slots() {
            match slot {
                FileSlot::Single(name) => removed_files += self.remove_file(name),
                FileSlot::Many(names) => {
                    removed_files += names.iter().map(|name| self.remove_file(name)).sum::<usize>()
                }
            }
        }

        info!(
            "Deleted history entry {} and {} associated files",
            id, removed_files
        );
        Ok(DeleteOutcome::Deleted { removed_files })
    }

    /// Missing or empty files are an empty history; unparseable files are
    /// logged and treated the same way.
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HistoryError::Read(e)),
        };
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice(&data) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    "History file {} is not valid JSON, treating it as empty: {}",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let json = serde_json::to_vec_pretty(entries).map_err(HistoryError::Serialize)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(HistoryError::Write)?;

        let mut temp = NamedTempFile::new_in(dir).map_err(HistoryError::Write)?;
        temp.write_all(&json).map_err(HistoryError::Write)?;
        temp.flush().map_err(HistoryError::Write)?;
        temp.persist(&self.path)
            .map_err(|e| HistoryError::Write(e.error))?;

        debug!(
            "History file {} saved ({} entries)",
            self.path.display(),
            entries.len()
        );
        Ok(())
    }

    /// Returns 1 when a file was removed.
    fn remove_file(&self, name: &str) -> usize {
        if !is_plain_file_name(name) {
            warn!("Refusing to delete suspicious file reference '{}'", name);
            return 0;
        }

        match fs::remove_file(self.files_dir.join(name)) {
            Ok(()) => 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Generated file {} already gone", name);
                0
            }
            Err(e) => {
                error!("Failed to delete generated file {}: {}", name, e);
                0
            }
        }
    }
}
