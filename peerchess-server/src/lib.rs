//! Room store and mailbox signaling server for peerchess.
//!
//! Two listeners run side by side:
//! - the room server (`/rooms`), a WebSocket key/value store whose records can
//!   be tied to the lifetime of the connection that created them
//! - the signaling server (`/{mailbox}`), a matchbox-compatible relay where
//!   every URL path is its own full-mesh room

pub mod config;
pub mod error;
pub mod room_route;
pub mod room_storage;
pub mod signaling;
pub mod telemetry;

pub use config::ServerArgs;
pub use error::{ServerError, SignalingError};
pub use room_route::create_room_route;
pub use room_storage::RoomStorage;
pub use signaling::{create_signaling_route, MailboxRegistry};

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

/// Bind both listeners and serve until one of them fails
pub async fn run(args: ServerArgs) -> Result<(), ServerError> {
    let rooms = serve(
        "room server",
        args.room_addr,
        create_room_route(RoomStorage::new()),
    );
    let signaling = serve(
        "signaling server",
        args.signaling_addr,
        create_signaling_route(MailboxRegistry::new()),
    );

    tokio::try_join!(rooms, signaling)?;
    Ok(())
}

async fn serve(name: &'static str, addr: SocketAddr, app: axum::Router) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!("🚀 {} listening on {}", name, addr);

    axum::serve(listener, app).await?;
    Ok(())
}
