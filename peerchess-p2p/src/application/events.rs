use crate::domain::{PeerId, PeerIdentity};
use peerchess_core::{AppliedMove, ChessMove, MediaCallSession, RoomId, Side, TurnState};

/// Events emitted by a transport
#[derive(Debug, Clone)]
pub enum ConnectionEvent {
    /// A new peer has connected
    PeerConnected(PeerId),
    /// A peer has disconnected
    PeerDisconnected(PeerId),
    /// Received a message from a peer
    MessageReceived { from: PeerId, data: Vec<u8> },
}

/// Progress of a game as seen by the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    IdentityAssigned(PeerIdentity),
    /// Host: share this id with the opponent
    RoomCreated(RoomId),
    RoomJoined {
        room: RoomId,
        host: PeerIdentity,
    },
    Connected {
        remote: PeerId,
    },
    LocalMediaSettled {
        has_media: bool,
    },
    CallEstablished(MediaCallSession),
    /// Neither side has media
    CallSkipped,
    GameStarted {
        local_side: Side,
    },
    MoveApplied {
        applied: AppliedMove,
        local: bool,
        turn: TurnState,
    },
    MoveRejected {
        mv: ChessMove,
        reason: String,
        remote: bool,
    },
    Disconnected,
}

/// Receives [`GameEvent`]s as they happen
pub type EventSink = Box<dyn FnMut(&GameEvent) + Send>;
