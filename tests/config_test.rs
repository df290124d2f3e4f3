//! Tests for server configuration.

use shishima::{ServerConfig, StorageKind};
use std::path::Path;

#[test]
fn test_defaults() {
    let config = ServerConfig::default();
    assert_eq!(*config.storage(), StorageKind::Memory);
    assert_eq!(config.file_path(), Path::new("shishima_games.json"));
    assert_eq!(config.snapshot_path(), Path::new("saved_game.json"));
    assert_eq!(config.host(), "127.0.0.1");
    assert_eq!(*config.port(), 3000);
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = ServerConfig::from_toml("").expect("Parse failed");
    assert_eq!(config, ServerConfig::default());
}

#[test]
fn test_partial_toml() {
    let config = ServerConfig::from_toml(
        r#"
storage = "file"
file_path = "games.json"
port = 8080
"#,
    )
    .expect("Parse failed");
    assert_eq!(*config.storage(), StorageKind::File);
    assert_eq!(config.file_path(), Path::new("games.json"));
    assert_eq!(*config.port(), 8080);
    assert_eq!(config.host(), "127.0.0.1");
}

#[test]
fn test_unknown_storage_rejected() {
    let result = ServerConfig::from_toml(r#"storage = "postgres""#);
    let err = result.expect_err("Unknown storage should fail");
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_load_or_default_missing_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = ServerConfig::load_or_default(dir.path().join("absent.toml")).expect("Load failed");
    assert_eq!(config, ServerConfig::default());
}

#[test]
fn test_from_file_and_build_store() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let games = dir.path().join("games.json");
    let config_path = dir.path().join("shishima.toml");
    std::fs::write(
        &config_path,
        format!("storage = \"file\"\nfile_path = {:?}\n", games.display().to_string()),
    )
    .expect("Write failed");

    let config = ServerConfig::from_file(&config_path).expect("Load failed");
    let store = config.build_store().expect("Store failed");
    let id = store.create_game("Alice", "Bob").expect("Create failed");
    assert_eq!(id, "1");
    assert!(games.exists());
}

#[test]
fn test_setters_override() {
    let config = ServerConfig::default()
        .with_port(9000)
        .with_host("0.0.0.0".to_string())
        .with_storage(StorageKind::File);
    assert_eq!(*config.port(), 9000);
    assert_eq!(config.host(), "0.0.0.0");
    assert_eq!(*config.storage(), StorageKind::File);
}
