//! Error types shared across the crate.

use std::fmt::{Display, Formatter};

/// Shared crate result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error enumeration covering every engine-communication failure mode.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// The engine process could not be created or its stdio captured.
    SpawnFailed(String),
    /// The `uci` handshake did not reach `uciok` within the init deadline.
    InitTimeout(String),
    /// A search (or resync) did not finish within its deadline.
    EngineTimeout(String),
    /// The engine is not running or reported that it has no move.
    Engine(String),
    /// A response line was malformed or its move did not parse.
    Protocol(String),
    /// Reading from or writing to the engine's streams failed.
    Transport(String),
    /// The rules collaborator rejected a position operation.
    Position(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::SpawnFailed(msg) => write!(f, "spawn failed: {msg}"),
            Self::InitTimeout(msg) => write!(f, "init timeout: {msg}"),
            Self::EngineTimeout(msg) => write!(f, "engine timeout: {msg}"),
            Self::Engine(msg) => write!(f, "engine: {msg}"),
            Self::Protocol(msg) => write!(f, "protocol: {msg}"),
            Self::Transport(msg) => write!(f, "transport: {msg}"),
            Self::Position(msg) => write!(f, "position: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
