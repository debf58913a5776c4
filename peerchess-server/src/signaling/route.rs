use super::mailbox::{MailboxRegistry, SignalEvent};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::{routing::get, Router};
use futures_util::{SinkExt, StreamExt};
use matchbox_protocol::{PeerId, PeerRequest};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 32;

pub fn create_signaling_route(registry: MailboxRegistry) -> Router {
    Router::new()
        .route("/:mailbox", get(handle_signaling_connection))
        .with_state(registry)
}

async fn handle_signaling_connection(
    ws: WebSocketUpgrade,
    State(registry): State<MailboxRegistry>,
    Path(mailbox): Path<String>,
) -> impl IntoResponse {
    debug!("New signaling connection for mailbox {}", mailbox);
    ws.on_upgrade(move |socket| handle_socket(socket, registry, mailbox))
}

async fn handle_socket(socket: WebSocket, registry: MailboxRegistry, mailbox: String) {
    let peer = PeerId(Uuid::new_v4());
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<SignalEvent>(CHANNEL_CAPACITY);

    let send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize signaling event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    if let Err(e) = registry.join(&mailbox, peer, tx).await {
        error!("Failed to register peer in {}: {}", mailbox, e);
        send_task.abort();
        return;
    }

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(text) => {
                match serde_json::from_str::<PeerRequest<serde_json::Value>>(&text) {
                    Ok(PeerRequest::Signal { receiver, data }) => {
                        if let Err(e) = registry.forward(&mailbox, peer, receiver, data).await {
                            warn!("Failed to forward signal: {}", e);
                        }
                    }
                    Ok(PeerRequest::KeepAlive) => {}
                    Err(e) => error!("Failed to parse signaling request: {}", e),
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    info!("🔌 Peer {:?} left {}", peer, mailbox);
    registry.leave(&mailbox, peer).await;
    send_task.abort();
}
