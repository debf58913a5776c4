//! Join a game hosted by `basic_host`.
//!
//! Usage: cargo run --example basic_guest <room_id>

use peerchess_core::{OccupancyRules, RoomId};
use peerchess_p2p::{
    GameOrchestrator, MatchboxConnection, SessionConfig, StaticMediaDevices, WsRoomStore,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let room = std::env::args()
        .nth(1)
        .ok_or("Usage: cargo run --example basic_guest <room_id>")?;
    let room = RoomId::parse(&room)?;

    let config = SessionConfig::default();
    let store = WsRoomStore::connect(&config.room_server_url()).await?;
    let transport = MatchboxConnection::open(&config);

    let mut game = GameOrchestrator::new(config, store, StaticMediaDevices::granted(true, true))
        .on_event(|event| println!("📣 {:?}", event))
        .join(transport, &room, OccupancyRules::new())
        .await?;

    println!("✅ Joined room {} as {}", room, game.turn().local_side());

    let mut interval = tokio::time::interval(Duration::from_millis(50));
    while !game.is_disconnected() {
        interval.tick().await;
        game.poll();
    }

    println!("👋 Host left");
    Ok(())
}
