//! Tests for the HTTP routes, driven through the router without a socket.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shishima::{AppState, Game, GameStore, MemoryStore, SessionManager, SnapshotFile, router};
use std::sync::Arc;
use tower::ServiceExt;

fn setup_app() -> (Router, AppState) {
    let state = AppState::new(SessionManager::new(), Arc::new(MemoryStore::new()));
    (router(state.clone()), state)
}

/// Sends one request and returns the status with the parsed JSON body.
async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Body was not JSON")
    };
    (status, value)
}

/// App backed by a fresh memory store that also writes saves to `path`.
fn setup_app_with_file(path: &std::path::Path) -> Router {
    let state = AppState::new(SessionManager::new(), Arc::new(MemoryStore::new()))
        .with_snapshot_file(SnapshotFile::new(path));
    router(state)
}

async fn create(app: &Router) -> String {
    create_between(app, "Alice", "Bob").await
}

async fn create_between(app: &Router, player1: &str, player2: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/games",
        Some(json!({"player1": player1, "player2": player2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["game_id"].as_str().expect("Missing game_id").to_string()
}

async fn place(app: &Router, id: &str, player: &str, to: [i32; 2]) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        &format!("/games/{id}/move"),
        Some(json!({"player": player, "to": to})),
    )
    .await
}

#[tokio::test]
async fn test_create_game() {
    let (app, _) = setup_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/games",
        Some(json!({"player1": "Alice", "player2": "Bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game_id"], "1");
    assert_eq!(body["snapshot"]["current_player"], "Alice");
    assert_eq!(body["snapshot"]["phase"], "setup");

    let (_, list) = send(&app, Method::GET, "/games", None).await;
    assert_eq!(list, json!(["1"]));
}

#[tokio::test]
async fn test_placement_and_status() {
    let (app, state) = setup_app();
    let id = create(&app).await;

    let (status, body) = place(&app, &id, "Alice", [0, 0]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "continue");
    assert_eq!(body["current_player"], "Bob");
    assert_eq!(body["board"][0][0], "Alice");

    let (status, snapshot) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["player_positions"]["Alice"], json!([[0, 0]]));

    // Every action is saved
    let record = state
        .store()
        .load_game(&id)
        .expect("Load failed")
        .expect("Missing record");
    assert!(record.snapshot().is_some());
}

#[tokio::test]
async fn test_rejected_placement() {
    let (app, _) = setup_app();
    let id = create(&app).await;

    let (status, body) = place(&app, &id, "Alice", [1, 1]).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "center_forbidden_during_setup");

    let (status, body) = place(&app, &id, "Alice", [3, 0]).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "out_of_bounds");

    // Still Alice's turn
    let (_, snapshot) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
    assert_eq!(snapshot["current_player"], "Alice");
}

#[tokio::test]
async fn test_move_requires_origin_in_play() {
    let (app, _) = setup_app();
    let id = create(&app).await;
    for (player, to) in [
        ("Alice", [0, 0]),
        ("Bob", [0, 2]),
        ("Alice", [1, 0]),
        ("Bob", [1, 2]),
        ("Alice", [2, 0]),
        ("Bob", [2, 2]),
    ] {
        let (status, _) = place(&app, &id, player, to).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = place(&app, &id, "Alice", [1, 1]).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "missing_origin");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/games/{id}/move"),
        Some(json!({"player": "Alice", "from": [1, 0], "to": [1, 1]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "continue");
    assert_eq!(body["phase"], "play");
    assert_eq!(body["current_player"], "Bob");
}

#[tokio::test]
async fn test_random_action() {
    let (app, _) = setup_app();
    let id = create(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/games/{id}/random"),
        Some(json!({"player": "Alice"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_player"], "Bob");
    assert!(body["board"][1][1].is_null(), "center stays empty during setup");
}

#[tokio::test]
async fn test_unknown_game() {
    let (app, _) = setup_app();
    let (status, body) = send(&app, Method::GET, "/games/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "game_not_found");

    let (status, _) = place(&app, "99", "Alice", [0, 0]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_and_load_latest() {
    let (app, _) = setup_app();

    let (status, body) = send(&app, Method::POST, "/load", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "nothing_saved");

    let id = create(&app).await;
    place(&app, &id, "Alice", [0, 0]).await;

    let (status, record) = send(&app, Method::POST, &format!("/games/{id}/save"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["game_id"], id.as_str());
    assert!(record["saved_at"].is_string());

    let (status, _) = send(&app, Method::DELETE, &format!("/games/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The memory store still remembers the last save
    let (status, record) = send(&app, Method::POST, "/load", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["game_id"], id.as_str());

    let (status, snapshot) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["current_player"], "Bob");
}

#[tokio::test]
async fn test_end_unknown_game() {
    let (app, _) = setup_app();
    let (status, _) = send(&app, Method::DELETE, "/games/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_id_is_not_reissued() {
    let (app, _) = setup_app();
    let first = create(&app).await;
    place(&app, &first, "Alice", [0, 0]).await;
    let (status, _) = send(&app, Method::DELETE, &format!("/games/{first}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let second = create_between(&app, "Carol", "Dave").await;
    assert_ne!(second, first);

    // Restoring the deleted match leaves the new one alone
    let (status, record) = send(&app, Method::POST, "/load", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["game_id"], first.as_str());

    let (_, restored) = send(&app, Method::GET, &format!("/games/{first}"), None).await;
    assert_eq!(restored["player1"], "Alice");
    let (_, live) = send(&app, Method::GET, &format!("/games/{second}"), None).await;
    assert_eq!(live["player1"], "Carol");

    let third = create(&app).await;
    assert_ne!(third, first);
    assert_ne!(third, second);
}

#[tokio::test]
async fn test_load_refuses_to_replace_other_match() {
    let (app, state) = setup_app();
    let id = create_between(&app, "Carol", "Dave").await;

    let mut other = Game::new("Alice", "Bob");
    other
        .place_setup_piece("Alice", shishima::Position::new(0, 0))
        .expect("Placement failed");
    state.store().save_game(&id, &other.status()).expect("Save failed");

    let (status, body) = send(&app, Method::POST, "/load", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "players_mismatch");

    let (_, live) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
    assert_eq!(live["player1"], "Carol");
}

#[tokio::test]
async fn test_save_file_survives_restart() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("saved_game.json");

    let app = setup_app_with_file(&path);
    let id = create(&app).await;
    place(&app, &id, "Alice", [0, 0]).await;
    let (status, _) = send(&app, Method::POST, &format!("/games/{id}/save"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(path.exists());

    // A fresh server with an empty memory store
    let app = setup_app_with_file(&path);
    let (status, body) = send(&app, Method::POST, "/load", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "nothing_saved");

    let (status, record) = send(&app, Method::POST, "/load/file", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["game_id"], id.as_str());

    let (_, snapshot) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
    assert_eq!(snapshot["current_player"], "Bob");

    // The restored id stays reserved
    let next = create(&app).await;
    assert_ne!(next, id);
}

#[tokio::test]
async fn test_load_file_without_save() {
    let (app, _) = setup_app();
    let (status, body) = send(&app, Method::POST, "/load/file", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "nothing_saved");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let app = setup_app_with_file(&dir.path().join("saved_game.json"));
    let (status, _) = send(&app, Method::POST, "/load/file", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_tracks_live_match() {
    let (app, state) = setup_app();
    let id = create(&app).await;

    for (player, to) in [("Alice", [0, 0]), ("Bob", [2, 2]), ("Alice", [1, 1]), ("Alice", [0, 1])] {
        place(&app, &id, player, to).await;
        send(
            &app,
            Method::POST,
            &format!("/games/{id}/random"),
            Some(json!({"player": "Bob"})),
        )
        .await;

        let (_, live) = send(&app, Method::GET, &format!("/games/{id}"), None).await;
        let stored = state
            .store()
            .load_game(&id)
            .expect("Load failed")
            .and_then(|record| record.into_snapshot())
            .expect("No stored snapshot");
        assert_eq!(serde_json::to_value(&stored).expect("Serialize failed"), live);
    }
}
