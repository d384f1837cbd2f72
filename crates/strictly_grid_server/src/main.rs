//! Strictly Grid - server binary.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_grid_server::{GameServer, ServerConfig, run_stdio};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    initialize_tracing();

    let cli = Cli::parse();
    let config = ServerConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Serve {
            port,
            host,
            engine_mode,
            mark_authority,
        } => {
            let mut config = config;
            if let Some(port) = port {
                config = config.with_port(port);
            }
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(mode) = engine_mode {
                config = config.with_engine_mode(mode);
            }
            if let Some(authority) = mark_authority {
                config = config.with_mark_authority(authority);
            }
            run_server(config).await
        }
        Command::Stdio => {
            info!("Running single session on stdin/stdout");
            run_stdio(&config).await?;
            Ok(())
        }
    }
}

/// Run the TCP server until Ctrl+C.
#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    config.validate()?;
    let server = GameServer::bind(config).await?;
    info!(addr = %server.local_addr()?, "Server ready");

    server
        .serve_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Logs go to stderr; stdout carries protocol lines in stdio mode.
fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_grid=debug,strictly_grid_server=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}
