//! Live match registry for the HTTP server.

use shishima_engine::{Game, Snapshot};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a match session.
pub type SessionId = String;

/// Error from the session registry.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// No live match has this id.
    #[display("Game {} not found", _0)]
    NotFound(SessionId),

    /// A live match already uses this id.
    #[display("Game {} already exists", _0)]
    AlreadyExists(SessionId),

    /// A restore targets a live match between other players.
    #[display("Game {} is live with different players", _0)]
    PlayersMismatch(SessionId),
}

impl std::error::Error for SessionError {}

/// Manages all live matches.
///
/// Cloning shares the same registry. Every operation on a match runs while
/// the registry lock is held, so a match never sees two operations at once.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, Game>>>,
}

impl SessionManager {
    /// Creates a new session manager.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Game>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new match under `id`.
    #[instrument(skip(self))]
    pub fn create_session(&self, id: SessionId, player1: &str, player2: &str) -> Result<SessionId, SessionError> {
        let mut sessions = self.lock();

        if sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::AlreadyExists(id));
        }

        sessions.insert(id.clone(), Game::new(player1, player2));
        info!(session_id = %id, "Created new session");
        Ok(id)
    }

    /// Installs a restored `game` under `id`.
    ///
    /// A live match with the same players is replaced; one between other
    /// players is left alone. Returns whether a live match was replaced.
    #[instrument(skip(self, game))]
    pub fn restore_session(&self, id: SessionId, game: Game) -> Result<bool, SessionError> {
        let mut sessions = self.lock();

        if let Some(live) = sessions.get(&id)
            && live.players() != game.players()
        {
            warn!(session_id = %id, "Refusing to restore over a different match");
            return Err(SessionError::PlayersMismatch(id));
        }

        let replaced = sessions.insert(id.clone(), game).is_some();
        info!(session_id = %id, replaced, "Session restored");
        Ok(replaced)
    }

    /// Runs `f` against the match while holding the registry lock.
    #[instrument(skip(self, f))]
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut Game) -> T) -> Result<T, SessionError> {
        let mut sessions = self.lock();
        let game = sessions.get_mut(id).ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::NotFound(id.to_string())
        })?;
        Ok(f(game))
    }

    /// Returns the current snapshot of a match.
    #[instrument(skip(self))]
    pub fn snapshot(&self, id: &str) -> Result<Snapshot, SessionError> {
        self.with_session(id, |game| game.status())
    }

    /// Discards a match.
    #[instrument(skip(self))]
    pub fn end_session(&self, id: &str) -> Result<(), SessionError> {
        match self.lock().remove(id) {
            Some(_) => {
                info!(session_id = id, "Session ended");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.to_string())),
        }
    }

    /// Lists all active session IDs, sorted.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.lock().keys().cloned().collect();
        ids.sort();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }
}
