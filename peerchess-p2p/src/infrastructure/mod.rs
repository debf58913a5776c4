pub mod connection;
pub mod error;
pub mod memory_room_store;
pub mod memory_transport;
pub mod message;
pub mod transport;
#[cfg(feature = "native")]
pub mod ws_room_store;

pub use connection::MatchboxConnection;
pub use memory_room_store::{MemoryRoomConnection, MemoryRoomStore};
pub use memory_transport::{MemoryNetwork, MemoryTransport};
pub use message::Decoded;
pub use transport::Transport;
#[cfg(feature = "native")]
pub use ws_room_store::WsRoomStore;
