//! Shishima - command-line entry point
//!
//! Runs the HTTP game server or a random self-play match.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use shishima::{AppState, ServerConfig, SessionManager, StorageKind, router, simulate};
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,shishima=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            storage,
            file_path,
            snapshot_path,
        } => run_http_server(config, host, port, storage, file_path, snapshot_path).await,
        Command::Simulate {
            player1,
            player2,
            seed,
            max_turns,
        } => run_simulate(player1, player2, seed, max_turns),
    }
}

/// Run the HTTP game server
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_http_server(
    config_path: PathBuf,
    host: Option<String>,
    port: Option<u16>,
    storage: Option<StorageKind>,
    file_path: Option<PathBuf>,
    snapshot_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = ServerConfig::load_or_default(&config_path)?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(storage) = storage {
        config = config.with_storage(storage);
    }
    if let Some(file_path) = file_path {
        config = config.with_file_path(file_path);
    }
    if let Some(snapshot_path) = snapshot_path {
        config = config.with_snapshot_path(snapshot_path);
    }

    let store = config.build_store()?;
    info!(storage = %config.storage(), "Snapshot store ready");

    let state = AppState::new(SessionManager::new(), store).with_snapshot_file(config.build_snapshot_file());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());

    axum::serve(listener, app).await?;
    info!("Server stopped");
    Ok(())
}

/// Play one random match and print every board
fn run_simulate(player1: String, player2: String, seed: Option<u64>, max_turns: usize) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, "Starting simulation");

    let report = simulate(&player1, &player2, seed, max_turns);
    for (turn, board) in report.boards.iter().enumerate() {
        println!("Turn {turn}:\n{board}\n");
    }
    println!("Result: {} (seed {seed})", report.outcome);
    Ok(())
}
