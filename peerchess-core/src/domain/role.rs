use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role within the game session - decides who waits in a room and who dials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Created the room and waits for the guest to dial in
    Host,
    /// Joined an existing room by its identifier
    Guest,
}

impl Role {
    pub fn is_host(&self) -> bool {
        matches!(self, Role::Host)
    }

    /// Colour played by this role (host opens the game)
    pub fn side(&self) -> Side {
        match self {
            Role::Host => Side::White,
            Role::Guest => Side::Black,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Host => write!(f, "Host"),
            Role::Guest => write!(f, "Guest"),
        }
    }
}

/// Chess side (colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => write!(f, "white"),
            Side::Black => write!(f, "black"),
        }
    }
}
