use clap::Parser;
use std::net::SocketAddr;

/// Command line and environment configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "peerchess-server", version, about = "peerchess room store and signaling server")]
pub struct ServerArgs {
    /// Address of the room store WebSocket endpoint
    #[arg(long, env = "PEERCHESS_ROOM_ADDR", default_value = "0.0.0.0:3537")]
    pub room_addr: SocketAddr,

    /// Address of the signaling relay
    #[arg(long, env = "PEERCHESS_SIGNALING_ADDR", default_value = "0.0.0.0:3536")]
    pub signaling_addr: SocketAddr,

    /// Emit logs as JSON lines
    #[arg(long, env = "PEERCHESS_LOG_JSON")]
    pub json_logs: bool,
}
