use crate::application::RoomStore;
use crate::infrastructure::error::StoreError;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use peerchess_core::{RoomId, RoomOp, RoomRecord, RoomRequest, RoomResponse, RoomResult};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Room store backed by the room server's WebSocket endpoint.
///
/// Disconnect cleanups are tied to this connection: dropping the store closes
/// the socket and the server removes every record it armed.
pub struct WsRoomStore {
    socket: Mutex<Socket>,
    next_id: AtomicU64,
}

impl WsRoomStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        tracing::info!("Connecting to room server: {}", url);

        let (socket, _response) = connect_async(url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            socket: Mutex::new(socket),
            next_id: AtomicU64::new(1),
        })
    }

    async fn request(&self, op: RoomOp) -> Result<RoomResult, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let text = serde_json::to_string(&RoomRequest::new(id, op))
            .map_err(|e| StoreError::Protocol(e.to_string()))?;

        let mut socket = self.socket.lock().await;
        socket
            .send(Message::text(text))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        while let Some(frame) = socket.next().await {
            let frame = frame.map_err(|e| StoreError::Unavailable(e.to_string()))?;

            match frame {
                Message::Text(_) => {
                    let text = frame
                        .to_text()
                        .map_err(|e| StoreError::Protocol(e.to_string()))?;
                    let response: RoomResponse = serde_json::from_str(text)
                        .map_err(|e| StoreError::Protocol(e.to_string()))?;

                    if response.id != id {
                        tracing::warn!("Skipping stale room reply {} (waiting for {})", response.id, id);
                        continue;
                    }

                    return match response.result {
                        RoomResult::Error { message } => Err(StoreError::Rejected(message)),
                        result => Ok(result),
                    };
                }
                Message::Close(_) => break,
                _ => {}
            }
        }

        Err(StoreError::Unavailable("room server closed the connection".to_string()))
    }
}

fn unexpected(result: RoomResult) -> StoreError {
    StoreError::Protocol(format!("unexpected reply {:?}", result))
}

#[async_trait]
impl RoomStore for WsRoomStore {
    async fn create_if_absent(
        &self,
        room: &RoomId,
        record: RoomRecord,
    ) -> Result<bool, StoreError> {
        let op = RoomOp::Create {
            room: room.clone(),
            record,
        };
        match self.request(op).await? {
            RoomResult::Created => Ok(true),
            RoomResult::Conflict => Ok(false),
            other => Err(unexpected(other)),
        }
    }

    async fn get(&self, room: &RoomId) -> Result<Option<RoomRecord>, StoreError> {
        match self.request(RoomOp::Get { room: room.clone() }).await? {
            RoomResult::Record { record } => Ok(record),
            other => Err(unexpected(other)),
        }
    }

    async fn remove(&self, room: &RoomId) -> Result<(), StoreError> {
        match self.request(RoomOp::Remove { room: room.clone() }).await? {
            RoomResult::Removed => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    async fn remove_on_disconnect(&self, room: &RoomId) -> Result<(), StoreError> {
        match self
            .request(RoomOp::RemoveOnDisconnect { room: room.clone() })
            .await?
        {
            RoomResult::Armed => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}
