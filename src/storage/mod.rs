//! Snapshot persistence for matches.
//!
//! Two interchangeable backends implement [`GameStore`]: an in-process map
//! and a single JSON file. Neither promises durability beyond what the
//! operating system gives a plain write.

mod error;
mod file;
mod memory;
mod models;
mod snapshot_file;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use models::{GameId, GameRecord};
pub use snapshot_file::SnapshotFile;

use shishima_engine::Snapshot;

/// Storage backend for match snapshots.
pub trait GameStore: Send + Sync + std::fmt::Debug {
    /// Allocates a new match id and records its players.
    fn create_game(&self, player1: &str, player2: &str) -> Result<GameId, StorageError>;

    /// Stores the latest snapshot of a match, creating the record if needed.
    fn save_game(&self, game_id: &str, snapshot: &Snapshot) -> Result<GameRecord, StorageError>;

    /// Returns the record for `game_id`, if any.
    fn load_game(&self, game_id: &str) -> Result<Option<GameRecord>, StorageError>;

    /// Returns the record a restore should start from, if any.
    fn load_latest(&self) -> Result<Option<GameRecord>, StorageError>;

    /// Removes a match. Returns whether it existed.
    fn delete_game(&self, game_id: &str) -> Result<bool, StorageError>;
}

/// Issues the next numeric id and advances the high-water mark.
///
/// Ids are never handed out twice, even after the record is deleted.
fn next_game_id<'a>(last_issued: &mut u64, ids: impl Iterator<Item = &'a GameId>) -> GameId {
    for id in ids {
        reserve_game_id(last_issued, id);
    }
    *last_issued += 1;
    last_issued.to_string()
}

/// Raises the high-water mark past `game_id` when it is numeric.
fn reserve_game_id(last_issued: &mut u64, game_id: &str) {
    if let Ok(n) = game_id.parse::<u64>() {
        *last_issued = (*last_issued).max(n);
    }
}
