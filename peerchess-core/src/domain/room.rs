use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Collection under which room records live in the coordination store
pub const GAMES_COLLECTION: &str = "games";

const ROOM_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const ROOM_ID_LEN: usize = 6;

/// Short, human-typeable room identifier (e.g. `ab12cd`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RoomIdError {
    #[error("Room ID cannot be empty")]
    Empty,

    #[error("Room ID must be between 4 and 16 characters: {0}")]
    InvalidLength(String),

    #[error("Room ID may only contain letters and digits: {0}")]
    InvalidCharacter(String),
}

impl RoomId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        let id = bytes
            .iter()
            .take(ROOM_ID_LEN)
            .map(|b| ROOM_ID_ALPHABET[*b as usize % ROOM_ID_ALPHABET.len()] as char)
            .collect();
        Self(id)
    }

    /// Parse user input (case-insensitive)
    pub fn parse(s: &str) -> Result<Self, RoomIdError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RoomIdError::Empty);
        }
        if !(4..=16).contains(&trimmed.len()) {
            return Err(RoomIdError::InvalidLength(trimmed.to_string()));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RoomIdError::InvalidCharacter(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// Parse a URL fragment (`#ab12cd`). An empty fragment means "no room".
    pub fn from_fragment(fragment: &str) -> Result<Option<Self>, RoomIdError> {
        let id = fragment.strip_prefix('#').unwrap_or(fragment);
        if id.trim().is_empty() {
            return Ok(None);
        }
        Self::parse(id).map(Some)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of this room's record in the coordination store
    pub fn record_path(&self) -> String {
        format!("{}/{}", GAMES_COLLECTION, self.0)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RoomId {
    type Error = RoomIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

/// Record advertising a waiting host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct RoomRecord {
    #[serde(rename = "hostIdentity")]
    pub host_identity: String,
}

impl RoomRecord {
    pub fn new(host_identity: impl Into<String>) -> Self {
        Self {
            host_identity: host_identity.into(),
        }
    }
}
