mod bootstrap;
mod config;
mod events;
mod listeners;
mod media_gate;
mod orchestrator;
mod rooms;
pub mod runtime;
mod session;

pub use bootstrap::SignalingBootstrap;
pub use config::{ConfigError, SessionConfig};
pub use events::{ConnectionEvent, EventSink, GameEvent};
pub use listeners::{ListenerId, ListenerRegistry};
pub use media_gate::{MediaDevices, MediaGate, Presence, PresenceJoin, StaticMediaDevices};
pub use orchestrator::{Game, GameOrchestrator};
pub use rooms::{RoomCoordinator, RoomStore};
pub use runtime::{OutboundQueue, QueueError};
pub use session::{Connection, Session};
