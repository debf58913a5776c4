mod connection_state;
mod ice_server;
mod peer;

pub use connection_state::ConnectionState;
pub use ice_server::IceServer;
pub use peer::{MatchboxPeerId, PeerId, PeerIdentity};
