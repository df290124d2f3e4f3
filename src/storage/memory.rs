//! In-process snapshot store.

use super::{GameId, GameRecord, GameStore, StorageError, next_game_id, reserve_game_id};
use shishima_engine::Snapshot;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument};

#[derive(Debug, Default)]
struct Inner {
    games: HashMap<GameId, GameRecord>,
    last_saved: Option<GameRecord>,
    last_issued: u64,
}

/// Keeps records in memory; `load_latest` returns the most recent save.
///
/// The last save is kept even if its match is later deleted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory game store");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GameStore for MemoryStore {
    #[instrument(skip(self))]
    fn create_game(&self, player1: &str, player2: &str) -> Result<GameId, StorageError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let game_id = next_game_id(&mut inner.last_issued, inner.games.keys());
        let record = GameRecord::new(game_id.clone(), player1.to_string(), player2.to_string());
        inner.games.insert(game_id.clone(), record);
        info!(game_id = %game_id, "Game created");
        Ok(game_id)
    }

    #[instrument(skip(self, snapshot))]
    fn save_game(&self, game_id: &str, snapshot: &Snapshot) -> Result<GameRecord, StorageError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        reserve_game_id(&mut inner.last_issued, game_id);
        let record = inner.games.entry(game_id.to_string()).or_insert_with(|| {
            GameRecord::new(
                game_id.to_string(),
                snapshot.player1.clone(),
                snapshot.player2.clone(),
            )
        });
        record.record_snapshot(snapshot.clone());
        let saved = record.clone();
        inner.last_saved = Some(saved.clone());
        debug!(game_id, "Snapshot saved");
        Ok(saved)
    }

    #[instrument(skip(self))]
    fn load_game(&self, game_id: &str) -> Result<Option<GameRecord>, StorageError> {
        Ok(self.lock().games.get(game_id).cloned())
    }

    #[instrument(skip(self))]
    fn load_latest(&self) -> Result<Option<GameRecord>, StorageError> {
        let latest = self.lock().last_saved.clone();
        debug!(found = latest.is_some(), "Loaded latest save");
        Ok(latest)
    }

    #[instrument(skip(self))]
    fn delete_game(&self, game_id: &str) -> Result<bool, StorageError> {
        let removed = self.lock().games.remove(game_id).is_some();
        debug!(game_id, removed, "Game deleted");
        Ok(removed)
    }
}
