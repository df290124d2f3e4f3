//! HTTP routes over the session registry and snapshot store.
//!
//! Handlers are thin: they look up the match, call one engine operation
//! and save the resulting snapshot while the registry lock is held, then
//! translate the outcome to JSON. Saving under the lock keeps the store in
//! the order actions were applied.

use crate::session::{SessionError, SessionId, SessionManager};
use crate::storage::{GameRecord, GameStore, SnapshotFile, StorageError};
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shishima_engine::{Game, GameError, Position, Snapshot, Transition};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument, warn};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    sessions: SessionManager,
    store: Arc<dyn GameStore>,
    snapshot_file: Option<Arc<SnapshotFile>>,
}

impl AppState {
    /// Bundles a registry and a store.
    pub fn new(sessions: SessionManager, store: Arc<dyn GameStore>) -> Self {
        Self {
            sessions,
            store,
            snapshot_file: None,
        }
    }

    /// Also writes every explicit save to `file`, enabling `/load/file`.
    pub fn with_snapshot_file(mut self, file: SnapshotFile) -> Self {
        self.snapshot_file = Some(Arc::new(file));
        self
    }

    /// The snapshot store.
    pub fn store(&self) -> &Arc<dyn GameStore> {
        &self.store
    }
}

/// Request for creating a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameRequest {
    /// First player; acts first.
    pub player1: String,
    /// Second player.
    pub player2: String,
}

/// Response after creating a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGameResponse {
    /// Id of the new match.
    pub game_id: SessionId,
    /// Initial state.
    pub snapshot: Snapshot,
}

/// Request for placing or moving a piece.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Acting player.
    pub player: String,
    /// Origin square; required during play, ignored during setup.
    #[serde(default)]
    pub from: Option<Position>,
    /// Target square.
    pub to: Position,
}

/// Request for a random legal action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomActionRequest {
    /// Acting player.
    pub player: String,
}

/// Plain status message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusMessage {
    /// Human-readable status.
    pub status: String,
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Stable machine-readable kind.
    pub kind: String,
}

/// Error returned by a handler.
#[derive(Debug, derive_more::Display, derive_more::From)]
pub enum ApiError {
    /// The engine rejected the action.
    #[display("{_0}")]
    Game(GameError),
    /// Registry lookup failed.
    #[display("{_0}")]
    Session(SessionError),
    /// Snapshot store failed.
    #[display("{_0}")]
    Storage(StorageError),
    /// Nothing saved to load.
    #[from(ignore)]
    #[display("{_0}")]
    NothingSaved(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self {
            ApiError::Game(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.kind()),
            ApiError::Session(SessionError::NotFound(_)) => (StatusCode::NOT_FOUND, "game_not_found"),
            ApiError::Session(SessionError::AlreadyExists(_)) => (StatusCode::CONFLICT, "game_exists"),
            ApiError::Session(SessionError::PlayersMismatch(_)) => (StatusCode::CONFLICT, "players_mismatch"),
            ApiError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage"),
            ApiError::NothingSaved(_) => (StatusCode::NOT_FOUND, "nothing_saved"),
        };
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            debug!(error = %self, kind, "Request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
            kind: kind.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/games", post(create_game).get(list_games))
        .route("/games/{id}", get(game_status).delete(end_game))
        .route("/games/{id}/move", post(make_move))
        .route("/games/{id}/random", post(random_action))
        .route("/games/{id}/save", post(save_game))
        .route("/load", post(load_latest))
        .route("/load/file", post(load_from_file))
        .layer(ServiceBuilder::new().map_request(log_request))
        .with_state(state)
}

fn log_request(req: Request) -> Request {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

#[instrument(skip(state, req), fields(player1 = %req.player1, player2 = %req.player2))]
async fn create_game(
    State(state): State<AppState>,
    Json(req): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    let game_id = state.store.create_game(&req.player1, &req.player2)?;
    if let Err(e) = state.sessions.create_session(game_id.clone(), &req.player1, &req.player2) {
        state.store.delete_game(&game_id)?;
        return Err(e.into());
    }
    let snapshot = state.sessions.snapshot(&game_id)?;
    info!(game_id = %game_id, "Game initialized");
    Ok(Json(CreateGameResponse { game_id, snapshot }))
}

async fn list_games(State(state): State<AppState>) -> Json<Vec<SessionId>> {
    Json(state.sessions.list_sessions())
}

#[instrument(skip(state))]
async fn game_status(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Snapshot>, ApiError> {
    Ok(Json(state.sessions.snapshot(&id)?))
}

#[instrument(skip(state, req), fields(player = %req.player, from = ?req.from, to = %req.to))]
async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<Transition>, ApiError> {
    let result = state.sessions.with_session(&id, |game| {
        let result = game.play(&req.player, req.from, req.to);
        state.store.save_game(&id, &game.status()).map(|_| result)
    })??;
    Ok(Json(result?))
}

#[instrument(skip(state, req), fields(player = %req.player))]
async fn random_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RandomActionRequest>,
) -> Result<Json<Transition>, ApiError> {
    let result = state.sessions.with_session(&id, |game| {
        let mut rng = rand::thread_rng();
        let result = game.random_action(&req.player, &mut rng);
        state.store.save_game(&id, &game.status()).map(|_| result)
    })??;
    Ok(Json(result?))
}

#[instrument(skip(state))]
async fn save_game(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<GameRecord>, ApiError> {
    let record = state.sessions.with_session(&id, |game| -> Result<GameRecord, StorageError> {
        let record = state.store.save_game(&id, &game.status())?;
        if let Some(file) = &state.snapshot_file {
            file.save(&record)?;
        }
        Ok(record)
    })??;
    info!(game_id = %id, "Game saved");
    Ok(Json(record))
}

#[instrument(skip(state))]
async fn load_latest(State(state): State<AppState>) -> Result<Json<GameRecord>, ApiError> {
    let record = state
        .store
        .load_latest()?
        .ok_or_else(|| ApiError::NothingSaved("No saved game".to_string()))?;
    restore_record(&state, record).map(Json)
}

#[instrument(skip(state))]
async fn load_from_file(State(state): State<AppState>) -> Result<Json<GameRecord>, ApiError> {
    let record = match &state.snapshot_file {
        Some(file) => file.load()?,
        None => None,
    }
    .ok_or_else(|| ApiError::NothingSaved("No game saved in file".to_string()))?;
    restore_record(&state, record).map(Json)
}

/// Validates a stored match and makes it live again under its id.
///
/// The snapshot is written back to the store so the id stays reserved
/// there, which matters when it came from the save file.
fn restore_record(state: &AppState, record: GameRecord) -> Result<GameRecord, ApiError> {
    let game_id = record.game_id().clone();
    let snapshot = record
        .into_snapshot()
        .ok_or_else(|| ApiError::NothingSaved(format!("Game {game_id} has no saved state")))?;

    let game = Game::restore(snapshot)?;
    state.sessions.restore_session(game_id.clone(), game)?;
    let record = state
        .sessions
        .with_session(&game_id, |game| state.store.save_game(&game_id, &game.status()))??;
    info!(game_id = %game_id, "Game restored");
    Ok(record)
}

#[instrument(skip(state))]
async fn end_game(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<StatusMessage>, ApiError> {
    state.sessions.end_session(&id)?;
    if !state.store.delete_game(&id)? {
        warn!(game_id = %id, "Ended game had no stored record");
    }
    Ok(Json(StatusMessage {
        status: "Game ended".to_string(),
    }))
}
