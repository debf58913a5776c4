use crate::room_storage::RoomStorage;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use peerchess_core::{OwnerId, RoomRequest, RoomResponse, RoomResult};
use tracing::{debug, error, info, instrument, warn};

pub fn create_room_route(storage: RoomStorage) -> Router {
    Router::new()
        .route("/rooms", get(handle_websocket))
        .with_state(storage)
}

#[instrument(skip(ws, storage))]
async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(storage): State<RoomStorage>,
) -> impl IntoResponse {
    debug!("New room store connection");
    ws.on_upgrade(move |socket| listen(socket, storage))
}

#[instrument(skip(socket, storage), fields(owner))]
async fn listen(mut socket: WebSocket, storage: RoomStorage) {
    let owner = storage.register();
    tracing::Span::current().record("owner", owner);
    info!(owner, "Room store client connected");

    while let Some(message) = socket.recv().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                warn!(owner, error = ?e, "Failed to receive message");
                break;
            }
        };

        match message {
            Message::Text(text) => {
                let Some(reply) = handle_text(&storage, owner, &text) else {
                    continue;
                };
                if let Err(e) = socket.send(Message::Text(reply)).await {
                    error!(owner, error = ?e, "Failed to send reply");
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!(owner, "Room store client disconnected");
    storage.release(owner);
}

/// Answer one request frame; unparseable frames with a readable `id` get an
/// error reply, anything else is dropped
fn handle_text(storage: &RoomStorage, owner: OwnerId, text: &str) -> Option<String> {
    let response = match serde_json::from_str::<RoomRequest>(text) {
        Ok(request) => RoomResponse::new(request.id, storage.handle(owner, request.op)),
        Err(e) => {
            warn!(owner, error = %e, "Malformed room request");
            let id = serde_json::from_str::<serde_json::Value>(text)
                .ok()?
                .get("id")?
                .as_u64()?;
            RoomResponse::new(
                id,
                RoomResult::Error {
                    message: e.to_string(),
                },
            )
        }
    };

    match serde_json::to_string(&response) {
        Ok(reply) => Some(reply),
        Err(e) => {
            error!(owner, error = ?e, "Failed to serialize reply");
            None
        }
    }
}
