//! Single-match save file kept next to the configured store.

use super::{GameRecord, StorageError};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, instrument};

/// Holds the most recently saved match, overwritten on every save.
///
/// Lets a server running on the memory store carry a match across
/// restarts.
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SnapshotFile {
    /// Uses `path` as the save file. Nothing is written until the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Replaces the file contents with `record`.
    #[instrument(skip(self, record), fields(path = %self.path.display(), game_id = %record.game_id()))]
    pub fn save(&self, record: &GameRecord) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, content).map_err(|e| {
            StorageError::new(format!("Failed to write '{}': {}", self.path.display(), e))
        })?;
        info!("Match written to save file");
        Ok(())
    }

    /// Reads the saved match, or `None` if nothing was saved yet.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Option<GameRecord>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.path.exists() {
            debug!("No save file");
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            StorageError::new(format!("Failed to read '{}': {}", self.path.display(), e))
        })?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}
