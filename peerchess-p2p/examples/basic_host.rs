//! Host a game against a local `peerchess-server`.
//!
//! Prints the room id, waits for a guest and then relays moves typed as
//! coordinates (`e2e4`) on stdin.

use peerchess_core::{ChessMove, OccupancyRules};
use peerchess_p2p::{
    GameOrchestrator, MatchboxConnection, SessionConfig, StaticMediaDevices, WsRoomStore,
};
use std::io::BufRead;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = SessionConfig::default();
    let store = WsRoomStore::connect(&config.room_server_url()).await?;
    let transport = MatchboxConnection::open(&config);

    let mut game = GameOrchestrator::new(config, store, StaticMediaDevices::denied())
        .on_event(|event| println!("📣 {:?}", event))
        .host(transport, OccupancyRules::new())
        .await?;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut interval = tokio::time::interval(Duration::from_millis(50));
    while !game.is_disconnected() {
        interval.tick().await;
        game.poll();

        while let Ok(line) = rx.try_recv() {
            match ChessMove::parse_coordinate(line.trim()) {
                Ok(mv) => {
                    if let Err(e) = game.play_local(mv) {
                        println!("❌ {}", e);
                    }
                }
                Err(e) => println!("❌ {}", e),
            }
        }
    }

    Ok(())
}
