//! Server configuration loaded from TOML.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_grid::BoardSize;
use tracing::{debug, info, instrument};

/// Port the original line-protocol server listened on.
pub const DEFAULT_PORT: u16 = 2715;

/// How connections map onto game engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// Every connection plays its own game, dropped when it disconnects.
    #[default]
    PerConnection,
    /// All connections drive one game, serialized behind the registry lock.
    Shared,
}

/// Who decides which mark a `MOVE` places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MarkAuthority {
    /// The engine's turn order decides; the mark in the command is ignored.
    #[default]
    Server,
    /// A command naming the wrong mark is rejected as `INVALID_MOVE`.
    Strict,
}

/// Configuration for the game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Interface to bind.
    #[setters(into)]
    host: String,

    /// TCP port to bind.
    port: u16,

    /// Board side used when a `MOVE` arrives before any `SIZE`.
    default_board_size: BoardSize,

    /// Largest board a `SIZE` command may request.
    max_board_size: BoardSize,

    /// Per-connection or shared games.
    engine_mode: EngineMode,

    /// Whether the client-supplied mark is checked.
    mark_authority: MarkAuthority,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            default_board_size: BoardSize::DEFAULT,
            max_board_size: BoardSize::new(16).unwrap_or(BoardSize::DEFAULT),
            engine_mode: EngineMode::default(),
            mark_authority: MarkAuthority::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
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

    /// Checks that the fallback board fits under the size cap.
    ///
    /// Neither size can exceed [`BoardSize::MAX`]; larger values fail to parse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_board_size > self.max_board_size {
            return Err(ConfigError::new(format!(
                "default_board_size {} exceeds max_board_size {}",
                self.default_board_size, self.max_board_size
            )));
        }
        Ok(())
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
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(*config.port(), 2715);
        assert_eq!(config.default_board_size().get(), 3);
        assert_eq!(*config.engine_mode(), EngineMode::PerConnection);
        assert_eq!(*config.mark_authority(), MarkAuthority::Server);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ServerConfig::from_toml("port = 4000\nengine_mode = \"shared\"\n").unwrap();
        assert_eq!(*config.port(), 4000);
        assert_eq!(*config.engine_mode(), EngineMode::Shared);
        assert_eq!(config.host(), "127.0.0.1");
    }

    #[test]
    fn test_zero_board_size_rejected() {
        assert!(ServerConfig::from_toml("default_board_size = 0\n").is_err());
    }

    #[test]
    fn test_max_board_size_above_ceiling_rejected() {
        let err = ServerConfig::from_toml("max_board_size = 100000\n").unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
        assert!(ServerConfig::from_toml(&format!("max_board_size = {}\n", BoardSize::MAX)).is_ok());
    }

    #[test]
    fn test_default_above_max_rejected() {
        let err = ServerConfig::from_toml("default_board_size = 9\nmax_board_size = 5\n").unwrap_err();
        assert!(err.message.contains("exceeds"));
    }

    #[test]
    fn test_setters() {
        let config = ServerConfig::default().with_host("0.0.0.0").with_port(0);
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(*config.port(), 0);
    }
}
