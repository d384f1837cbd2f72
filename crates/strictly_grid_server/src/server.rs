//! TCP accept loop and stdio runner.

use crate::config::ServerConfig;
use crate::registry::SessionManager;
use crate::session::Session;
use derive_more::{Display, Error};
use std::future::Future;
use std::net::SocketAddr;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tracing::{Instrument, info, info_span, instrument, warn};

/// Server error with location tracking.
#[derive(Debug, Display, Error)]
#[display("Server error: {} at {}:{}", message, file, line)]
pub struct ServerError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ServerError {
    /// Creates a new server error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for ServerError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

/// Line-protocol game server.
///
/// Each accepted connection runs its own [`Session`] task. Sessions share
/// one [`SessionManager`], so in shared mode they drive the same game.
#[derive(Debug)]
pub struct GameServer {
    listener: TcpListener,
    config: ServerConfig,
    sessions: SessionManager,
}

impl GameServer {
    /// Binds the configured host and port.
    #[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind((config.host().as_str(), *config.port()))
            .await
            .map_err(|e| {
                ServerError::new(format!(
                    "Failed to bind {}:{}: {}",
                    config.host(),
                    config.port(),
                    e
                ))
            })?;
        let sessions = SessionManager::new(*config.default_board_size());
        info!(addr = ?listener.local_addr().ok(), "Listening");
        Ok(Self {
            listener,
            config,
            sessions,
        })
    }

    /// Address actually bound (useful when the configured port is 0).
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// The registry shared by all sessions of this server.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Accepts connections until the process ends.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.serve_until(std::future::pending()).await
    }

    /// Accepts connections until `shutdown` completes.
    ///
    /// Sessions already running are left to finish on their own.
    #[instrument(skip_all)]
    pub async fn serve_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut next_id: u64 = 0;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let id = format!("conn-{}", next_id);
                        next_id += 1;
                        self.spawn_session(id, stream, peer);
                    }
                    Err(e) => warn!(error = %e, "Failed to accept connection"),
                },
            }
        }
    }

    fn spawn_session(&self, id: String, stream: TcpStream, peer: SocketAddr) {
        info!(session = %id, %peer, "Client connected");
        let span = info_span!("connection", session = %id, %peer);
        let session = Session::new(id, self.sessions.clone(), &self.config);

        tokio::spawn(
            async move {
                let (read, write) = stream.into_split();
                // Errors are logged by the session; they end only this connection.
                let _ = session.run(BufReader::new(read), write).await;
            }
            .instrument(span),
        );
    }
}

/// Runs a single session over stdin/stdout until stdin closes.
#[instrument(skip_all)]
pub async fn run_stdio(config: &ServerConfig) -> std::io::Result<u64> {
    let sessions = SessionManager::new(*config.default_board_size());
    let session = Session::new("stdio", sessions, config);
    session
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
