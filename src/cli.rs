//! Command-line interface for shishima.

use shishima::StorageKind;
use clap::{Parser, Subcommand};

/// Shishima - two-player center-control game server
#[derive(Parser, Debug)]
#[command(name = "shishima")]
#[command(about = "Shishima game server and rules sandbox", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to server configuration file
        #[arg(short, long, default_value = "shishima.toml")]
        config: std::path::PathBuf,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Snapshot store (overrides config)
        #[arg(long, value_enum)]
        storage: Option<StorageKind>,

        /// JSON file for the file store (overrides config)
        #[arg(long)]
        file_path: Option<std::path::PathBuf>,

        /// Single-match save file (overrides config)
        #[arg(long)]
        snapshot_path: Option<std::path::PathBuf>,
    },

    /// Play a match with random moves for both sides and print every board
    Simulate {
        /// First player's label
        #[arg(long, default_value = "Alice")]
        player1: String,

        /// Second player's label
        #[arg(long, default_value = "Bob")]
        player2: String,

        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many actions
        #[arg(long, default_value = "100")]
        max_turns: usize,
    },
}
