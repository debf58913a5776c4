use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// Re-export the underlying matchbox type
pub use matchbox_socket::PeerId as MatchboxPeerId;

/// Transport-level handle of a peer on an open data channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(pub MatchboxPeerId);

impl PeerId {
    pub fn new(id: MatchboxPeerId) -> Self {
        Self(id)
    }

    /// Fresh random id (in-memory transports)
    pub fn random() -> Self {
        Self(MatchboxPeerId(Uuid::new_v4()))
    }

    pub fn inner(&self) -> MatchboxPeerId {
        self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MatchboxPeerId> for PeerId {
    fn from(id: MatchboxPeerId) -> Self {
        Self(id)
    }
}

/// Rendezvous identity of the local or remote peer.
///
/// Opaque to everything but the transport: the host publishes it in the room
/// record and the guest dials it. Lives as long as the session and is never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerIdentity(String);

impl PeerIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PeerIdentity {
    fn from(value: String) -> Self {
        Self(value)
    }
}
