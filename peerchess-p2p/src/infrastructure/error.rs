use instant::Duration;
use peerchess_core::{RoomId, TurnError};

/// Session layer errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("A connection is already being established or open")]
    AlreadyConnecting,

    #[error("Remote peer disconnected")]
    Disconnected,

    #[error("Timed out after {after:?} while {operation}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Outbound queue is full (max size: {max})")]
    QueueFull { max: usize },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Room(#[from] RoomError),

    #[error(transparent)]
    Media(#[from] MediaError),
}

/// Room coordination errors
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("Room not found: {0}")]
    NotFound(RoomId),

    #[error("No free room id after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("Room store error: {0}")]
    Store(#[from] StoreError),
}

/// Failures reported by a room store backend
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("Room store unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected room store reply: {0}")]
    Protocol(String),

    #[error("Room store rejected the request: {0}")]
    Rejected(String),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MediaError {
    #[error("Media access denied: {0}")]
    Denied(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
