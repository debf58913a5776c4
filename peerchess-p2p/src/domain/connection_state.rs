use crate::domain::PeerId;
use std::fmt;

/// Lifecycle of the single session connection.
///
/// `Idle -> Negotiating -> Open -> Closed`. A failed or timed out negotiation
/// falls back to `Idle`; `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Negotiating,
    Open { remote: PeerId },
    Closed,
}

impl ConnectionState {
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ConnectionState::Closed)
    }

    pub fn remote(&self) -> Option<PeerId> {
        match self {
            ConnectionState::Open { remote } => Some(*remote),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Idle => write!(f, "idle"),
            ConnectionState::Negotiating => write!(f, "negotiating"),
            ConnectionState::Open { remote } => write!(f, "open ({})", remote),
            ConnectionState::Closed => write!(f, "closed"),
        }
    }
}
