//! Line-protocol server for strictly_grid.
//!
//! # Architecture
//!
//! - **Protocol**: parses `SIZE`/`MOVE` lines and renders response lines
//! - **Session**: one peer's command loop, driving one game engine
//! - **Registry**: engines keyed by connection, or one shared engine
//! - **Server**: TCP accept loop spawning a task per connection
//!
//! # Example
//!
//! ```no_run
//! use strictly_grid_server::{GameServer, ServerConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let server = GameServer::bind(ServerConfig::default()).await?;
//! println!("listening on {}", server.local_addr()?);
//! server.serve().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod protocol;
mod registry;
mod server;
mod session;

pub use config::{ConfigError, DEFAULT_PORT, EngineMode, MarkAuthority, ServerConfig};
pub use protocol::{Command, MAX_LINE_LENGTH, ProtocolError, Response};
pub use registry::{SHARED_SESSION, SessionId, SessionManager};
pub use server::{GameServer, ServerError, run_stdio};
pub use session::Session;
