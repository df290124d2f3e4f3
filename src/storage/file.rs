//! Single-file JSON snapshot store.

use super::{GameId, GameRecord, GameStore, StorageError, next_game_id, reserve_game_id};
use serde::{Deserialize, Serialize};
use shishima_engine::Snapshot;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};

/// On-disk layout: the id high-water mark plus every record keyed by id.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    last_issued: u64,
    #[serde(default)]
    games: BTreeMap<GameId, GameRecord>,
}

/// Keeps every record in one JSON document.
///
/// Each operation reads the whole file and writes it back under a mutex.
/// `load_latest` returns the saved record with the highest numeric id.
/// The id high-water mark is stored alongside the records, so ids are not
/// reused across deletes or restarts.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Opens the store at `path`, creating an empty one if missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file cannot be created.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            info!("Creating empty game file");
            std::fs::write(&path, serde_json::to_string_pretty(&Document::default())?)?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    fn read(&self) -> Result<Document, StorageError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            StorageError::new(format!("Failed to read '{}': {}", self.path.display(), e))
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, document: &Document) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(document)?;
        std::fs::write(&self.path, content).map_err(|e| {
            StorageError::new(format!("Failed to write '{}': {}", self.path.display(), e))
        })
    }

    /// Runs `f` on the parsed document, writing it back when it asks to.
    fn update<T>(&self, f: impl FnOnce(&mut Document) -> (T, bool)) -> Result<T, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.read()?;
        let (value, dirty) = f(&mut document);
        if dirty {
            self.write(&document)?;
        }
        Ok(value)
    }
}

impl GameStore for FileStore {
    #[instrument(skip(self))]
    fn create_game(&self, player1: &str, player2: &str) -> Result<GameId, StorageError> {
        let game_id = self.update(|doc| {
            let game_id = next_game_id(&mut doc.last_issued, doc.games.keys());
            let record = GameRecord::new(game_id.clone(), player1.to_string(), player2.to_string());
            doc.games.insert(game_id.clone(), record);
            (game_id, true)
        })?;
        info!(game_id = %game_id, path = %self.path.display(), "Game created");
        Ok(game_id)
    }

    #[instrument(skip(self, snapshot))]
    fn save_game(&self, game_id: &str, snapshot: &Snapshot) -> Result<GameRecord, StorageError> {
        let saved = self.update(|doc| {
            reserve_game_id(&mut doc.last_issued, game_id);
            let record = doc.games.entry(game_id.to_string()).or_insert_with(|| {
                GameRecord::new(
                    game_id.to_string(),
                    snapshot.player1.clone(),
                    snapshot.player2.clone(),
                )
            });
            record.record_snapshot(snapshot.clone());
            (record.clone(), true)
        })?;
        debug!(game_id, "Snapshot saved");
        Ok(saved)
    }

    #[instrument(skip(self))]
    fn load_game(&self, game_id: &str) -> Result<Option<GameRecord>, StorageError> {
        self.update(|doc| (doc.games.get(game_id).cloned(), false))
    }

    #[instrument(skip(self))]
    fn load_latest(&self) -> Result<Option<GameRecord>, StorageError> {
        self.update(|doc| {
            let latest = doc
                .games
                .values()
                .filter(|record| record.snapshot().is_some())
                .filter_map(|record| match record.game_id().parse::<u64>() {
                    Ok(n) => Some((n, record)),
                    Err(_) => {
                        warn!(game_id = %record.game_id(), "Skipping non-numeric game id");
                        None
                    }
                })
                .max_by_key(|(n, _)| *n)
                .map(|(_, record)| record.clone());
            debug!(found = latest.is_some(), "Loaded latest save");
            (latest, false)
        })
    }

    #[instrument(skip(self))]
    fn delete_game(&self, game_id: &str) -> Result<bool, StorageError> {
        let removed = self.update(|doc| {
            let removed = doc.games.remove(game_id).is_some();
            (removed, removed)
        })?;
        debug!(game_id, removed, "Game deleted");
        Ok(removed)
    }
}
