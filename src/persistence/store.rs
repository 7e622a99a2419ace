//! Document persistence
//!
//! The core treats storage as an external collaborator behind the
//! [`DocumentStore`] trait: save the current content, load the most recent
//! one back. There is no retry logic here: a failed save surfaces to the
//! caller and the session's dirty state makes the next quiet period try
//! again.
//!
//! [`FileStore`] is the provided implementation: a single JSON record in a
//! platform data directory, written atomically so a crash mid-save never
//! leaves a truncated document behind. [`MemoryStore`] backs tests and
//! embedders that handle persistence themselves.

use crate::error::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the data directory
const APP_NAME: &str = "vellum";

/// Document record file name
const DOCUMENT_FILE_NAME: &str = "document.json";

/// Backup record file name (used during atomic writes)
const DOCUMENT_BACKUP_NAME: &str = "document.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Store Contract
// ─────────────────────────────────────────────────────────────────────────────

/// Save/load boundary between the editing core and its storage collaborator.
pub trait DocumentStore {
    /// Persist the given Markdown content.
    fn save(&self, content: &str) -> Result<()>;

    /// Load the most recently saved content, or `None` when nothing has
    /// been saved yet.
    fn load_latest(&self) -> Result<Option<String>>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Record
// ─────────────────────────────────────────────────────────────────────────────

/// The on-disk shape of a saved document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentRecord {
    /// The Markdown content
    content: String,
    /// Seconds since the Unix epoch at save time
    saved_at: u64,
}

impl DocumentRecord {
    fn new(content: &str) -> Self {
        let saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        Self {
            content: content.to_string(),
            saved_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Store
// ─────────────────────────────────────────────────────────────────────────────

/// JSON-file-backed document store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store persisting to an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the platform-default location, creating the data
    /// directory if necessary.
    ///
    /// - **Windows**: `%APPDATA%\vellum\document.json`
    /// - **macOS**: `~/Library/Application Support/vellum/document.json`
    /// - **Linux**: `~/.local/share/vellum/document.json`
    pub fn open_default() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .map(|base| base.join(APP_NAME))
            .ok_or(Error::DirNotFound)?;

        if !data_dir.exists() {
            debug!("Creating data directory: {}", data_dir.display());
            fs::create_dir_all(&data_dir).map_err(|e| Error::StoreSave {
                path: data_dir.clone(),
                source: Box::new(e),
            })?;
        }

        Ok(Self::new(data_dir.join(DOCUMENT_FILE_NAME)))
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileStore {
    fn save(&self, content: &str) -> Result<()> {
        let record = DocumentRecord::new(content);
        let json = serde_json::to_string_pretty(&record).map_err(|e| Error::StoreSave {
            path: self.path.clone(),
            source: Box::new(e),
        })?;

        // Write to backup file first (atomic write pattern)
        let backup_path = self.path.with_file_name(DOCUMENT_BACKUP_NAME);
        fs::write(&backup_path, &json).map_err(|e| Error::StoreSave {
            path: backup_path.clone(),
            source: Box::new(e),
        })?;

        // Replace original with backup
        fs::rename(&backup_path, &self.path).map_err(|e| Error::StoreSave {
            path: self.path.clone(),
            source: Box::new(e),
        })?;

        info!("Document saved to {}", self.path.display());
        Ok(())
    }

    fn load_latest(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            debug!("No document record at {}", self.path.display());
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| Error::StoreLoad {
            path: self.path.clone(),
            source: Box::new(e),
        })?;

        if contents.trim().is_empty() {
            return Ok(None);
        }

        let record: DocumentRecord = serde_json::from_str(&contents)?;
        debug!(
            "Loaded document record from {} (saved at {})",
            self.path.display(),
            record.saved_at
        );
        Ok(Some(record.content))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory document store for tests and embedders without disk access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    content: RefCell<Option<String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn save(&self, content: &str) -> Result<()> {
        *self.content.borrow_mut() = Some(content.to_string());
        Ok(())
    }

    fn load_latest(&self) -> Result<Option<String>> {
        Ok(self.content.borrow().clone())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("document.json"));
        assert_eq!(store.load_latest().unwrap(), None);
    }

    #[test]
    fn test_save_then_load_round_trips_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("document.json"));

        store.save("# Notes\n\nSome **bold** text.\n").unwrap();
        let loaded = store.load_latest().unwrap();
        assert_eq!(loaded.as_deref(), Some("# Notes\n\nSome **bold** text.\n"));
    }

    #[test]
    fn test_save_overwrites_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("document.json"));

        store.save("first").unwrap();
        store.save("second").unwrap();
        assert_eq!(store.load_latest().unwrap().as_deref(), Some("second"));
        // The atomic-write backup is renamed away, not left behind
        assert!(!dir.path().join(DOCUMENT_BACKUP_NAME).exists());
    }

    #[test]
    fn test_corrupted_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("document.json");
        fs::write(&path, "{definitely not json").unwrap();

        let store = FileStore::new(path);
        assert!(store.load_latest().is_err());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.load_latest().unwrap(), None);
        store.save("draft").unwrap();
        assert_eq!(store.load_latest().unwrap().as_deref(), Some("draft"));
    }
}
