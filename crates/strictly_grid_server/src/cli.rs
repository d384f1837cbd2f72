//! Command-line interface for strictly_grid_server.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_grid_server::{EngineMode, MarkAuthority};

/// Strictly Grid - N×N tic-tac-toe over a line protocol
#[derive(Parser, Debug)]
#[command(name = "strictly_grid_server")]
#[command(about = "Authoritative N×N tic-tac-toe engine over a text line protocol", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the server configuration file (defaults apply if it does not exist)
    #[arg(short, long, global = true, default_value = "strictly_grid.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Accept TCP connections, one session per connection
    Serve {
        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Give each connection its own game, or share one game
        #[arg(long, value_enum)]
        engine_mode: Option<EngineMode>,

        /// Reject moves whose mark is not the one to move
        #[arg(long, value_enum)]
        mark_authority: Option<MarkAuthority>,
    },

    /// Run a single session over stdin/stdout
    Stdio,
}
