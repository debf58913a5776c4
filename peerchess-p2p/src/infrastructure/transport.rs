use crate::application::ConnectionEvent;
use crate::domain::{PeerId, PeerIdentity};
use crate::infrastructure::error::Result;

/// Link between the session layer and a rendezvous/data-channel backend.
///
/// Every transport owns a mailbox named after its local identity. Remote peers
/// reach it by dialing that identity; once both ends share the mailbox a
/// `PeerConnected` event surfaces on each side. Implemented by the matchbox
/// WebRTC socket and by the in-memory network used in tests.
pub trait Transport {
    /// Local identity, available once the rendezvous service confirmed it
    fn local_identity(&mut self) -> Option<PeerIdentity>;

    /// Leave the local mailbox and join the one owned by `remote`
    fn dial(&mut self, remote: &PeerIdentity) -> Result<()>;

    /// Send raw bytes over the reliable channel
    fn send_to(&mut self, peer: PeerId, data: Vec<u8>) -> Result<()>;

    /// Drain pending connection and message events
    fn poll_events(&mut self) -> Vec<ConnectionEvent>;
}
