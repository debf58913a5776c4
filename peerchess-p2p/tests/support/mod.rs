#![allow(dead_code)]

use instant::Duration;
use peerchess_core::{ChessMove, SessionMessage};
use peerchess_p2p::{Connection, MemoryNetwork, MemoryTransport, Session, SessionConfig};
use std::sync::{Arc, Mutex};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("peerchess_p2p=debug")
        .with_test_writer()
        .try_init();
}

/// Short polling interval and timeouts so failures surface quickly
pub fn fast_config() -> SessionConfig {
    SessionConfig {
        poll_interval_ms: 1,
        bootstrap_timeout: Some(Duration::from_secs(2)),
        listen_timeout: Some(Duration::from_secs(2)),
        connect_timeout: Some(Duration::from_secs(2)),
        negotiate_timeout: Some(Duration::from_secs(2)),
        ..Default::default()
    }
}

pub struct Pair {
    pub network: MemoryNetwork,
    pub host: Session<MemoryTransport>,
    pub guest: Session<MemoryTransport>,
    pub host_side: Connection,
    pub guest_side: Connection,
}

pub fn sessions(network: &MemoryNetwork) -> (Session<MemoryTransport>, Session<MemoryTransport>) {
    (
        Session::new(network.endpoint(), fast_config()),
        Session::new(network.endpoint(), fast_config()),
    )
}

/// Connect two already created sessions over the network
pub async fn open(
    host: &mut Session<MemoryTransport>,
    guest: &mut Session<MemoryTransport>,
) -> (Connection, Connection) {
    let host_identity = host.local_identity().expect("host registered");
    let (host_side, guest_side) = tokio::join!(host.listen(), guest.connect(&host_identity));
    (
        host_side.expect("host listen"),
        guest_side.expect("guest connect"),
    )
}

pub async fn connected_pair() -> Pair {
    let network = MemoryNetwork::new();
    let (mut host, mut guest) = sessions(&network);
    let (host_side, guest_side) = open(&mut host, &mut guest).await;
    Pair {
        network,
        host,
        guest,
        host_side,
        guest_side,
    }
}

pub fn mv(notation: &str) -> ChessMove {
    ChessMove::parse_coordinate(notation).expect("valid notation")
}

pub fn move_message(notation: &str) -> SessionMessage {
    SessionMessage::ChessMove { mv: mv(notation) }
}

/// Listener that records every message it sees
pub fn record(session: &Session<MemoryTransport>) -> Arc<Mutex<Vec<SessionMessage>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let captured = seen.clone();
    session.add_listener(false, move |message| {
        captured.lock().unwrap().push(message.clone());
    });
    seen
}
