use peerchess_core::{MoveParseError, RoomIdError};
use peerchess_p2p::{ConfigError, SessionError, StoreError};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid schema directory: {path}")]
    InvalidSchemaDirectory { path: PathBuf },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Room server unavailable: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    LaunchUrl(#[from] ConfigError),

    #[error("Invalid room: {0}")]
    InvalidRoom(#[from] RoomIdError),

    #[error("Invalid move: {0}")]
    InvalidMove(#[from] MoveParseError),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl CliError {
    pub fn invalid_directory(path: PathBuf) -> Self {
        CliError::InvalidSchemaDirectory { path }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
