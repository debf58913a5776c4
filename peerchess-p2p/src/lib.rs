// Domain layer (identities, connection state)
pub mod domain;

// Application layer (session, media, rooms, orchestration)
pub mod application;

// Infrastructure layer (transports, stores, codec)
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    ConfigError, Connection, ConnectionEvent, Game, GameEvent, GameOrchestrator, ListenerId, MediaDevices,
    MediaGate, RoomCoordinator, RoomStore, Session, SessionConfig, SignalingBootstrap,
    StaticMediaDevices,
};
pub use domain::{ConnectionState, IceServer, PeerId, PeerIdentity};
pub use infrastructure::error::{MediaError, Result, RoomError, SessionError, StoreError};
pub use infrastructure::{
    MatchboxConnection, MemoryNetwork, MemoryRoomConnection, MemoryRoomStore, MemoryTransport,
    Transport,
};
#[cfg(feature = "native")]
pub use infrastructure::WsRoomStore;
