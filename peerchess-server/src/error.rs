use matchbox_protocol::PeerId;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Failed to initialize logging: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum SignalingError {
    #[error("Mailbox not found: {0}")]
    MailboxNotFound(String),

    #[error("Recipient not found: {0:?}")]
    RecipientNotFound(PeerId),

    #[error("Peer channel closed")]
    ChannelClosed,
}
