//! Stored match records.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use shishima_engine::Snapshot;

/// Identifier of a stored match (`"1"`, `"2"`, ...).
pub type GameId = String;

/// A match as kept by a [`GameStore`](super::GameStore).
///
/// Records are created with players only; the snapshot arrives with the
/// first save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, new)]
pub struct GameRecord {
    game_id: GameId,
    player1: String,
    player2: String,
    #[new(default)]
    #[serde(default)]
    snapshot: Option<Snapshot>,
    #[new(default)]
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

impl GameRecord {
    /// Replaces the snapshot and stamps the save time.
    pub fn record_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
        self.saved_at = Some(Utc::now());
    }

    /// Consumes the record, returning its snapshot.
    pub fn into_snapshot(self) -> Option<Snapshot> {
        self.snapshot
    }
}
