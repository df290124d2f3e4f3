//! Server configuration.

use crate::storage::{FileStore, GameStore, MemoryStore, SnapshotFile, StorageError};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Which snapshot store the server uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageKind {
    /// In-process map, lost on exit.
    Memory,
    /// Single JSON file at `file_path`.
    File,
}

/// Configuration for the game server, loaded from TOML.
///
/// ```toml
/// storage = "file"
/// file_path = "games.json"
/// port = 8080
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Snapshot store backend.
    #[serde(default = "default_storage")]
    storage: StorageKind,

    /// JSON file used by the file store.
    #[serde(default = "default_file_path")]
    file_path: PathBuf,

    /// Single-match save file written by every explicit save.
    #[serde(default = "default_snapshot_path")]
    snapshot_path: PathBuf,

    /// Address to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,
}

fn default_storage() -> StorageKind {
    StorageKind::Memory
}

fn default_file_path() -> PathBuf {
    PathBuf::from("shishima_games.json")
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("saved_game.json")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            file_path: default_file_path(),
            snapshot_path: default_snapshot_path(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(storage = %config.storage, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Opens the configured snapshot store.
    #[instrument(skip(self), fields(storage = %self.storage))]
    pub fn build_store(&self) -> Result<Arc<dyn GameStore>, StorageError> {
        Ok(match self.storage {
            StorageKind::Memory => Arc::new(MemoryStore::new()),
            StorageKind::File => Arc::new(FileStore::open(&self.file_path)?),
        })
    }

    /// The save file written next to the store.
    pub fn build_snapshot_file(&self) -> SnapshotFile {
        SnapshotFile::new(&self.snapshot_path)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
