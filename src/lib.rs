//! Shishima game server library.
//!
//! Wraps the pure [`shishima_engine`] rules in the pieces a hosted match
//! needs.
//!
//! # Architecture
//!
//! - **Session**: registry of live matches, one [`Game`] per id
//! - **Storage**: snapshot persistence, in memory or in a JSON file
//! - **Server**: axum routes over the registry and the store
//! - **Config**: TOML server configuration
//!
//! # Example
//!
//! ```
//! use shishima::{MemoryStore, GameStore, SessionManager};
//! use shishima_engine::Position;
//!
//! # fn example() -> anyhow::Result<()> {
//! let store = MemoryStore::new();
//! let sessions = SessionManager::new();
//!
//! let id = store.create_game("Alice", "Bob")?;
//! sessions.create_session(id.clone(), "Alice", "Bob")?;
//! sessions.with_session(&id, |game| game.place_setup_piece("Alice", Position::new(0, 0)))??;
//! store.save_game(&id, &sessions.snapshot(&id)?)?;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod server;
mod session;
mod simulate;
mod storage;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig, StorageKind};

// Crate-level exports - Server types
pub use server::{
    ApiError, AppState, CreateGameRequest, CreateGameResponse, ErrorBody, MoveRequest,
    RandomActionRequest, StatusMessage, router,
};

// Crate-level exports - Session management
pub use session::{SessionError, SessionId, SessionManager};

// Crate-level exports - Snapshot storage
pub use storage::{FileStore, GameId, GameRecord, GameStore, MemoryStore, SnapshotFile, StorageError};

// Crate-level exports - Self-play
pub use simulate::{SimulationOutcome, SimulationReport, simulate};

// Crate-level exports - Engine types
pub use shishima_engine::{
    Board, Game, GameError, Phase, PlayerId, Position, Snapshot, Square, Transition, TurnSummary,
};
