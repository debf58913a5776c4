//! Matchbox-compatible signaling relay.
//!
//! Each URL path is a mailbox: peers connected to the same path form a full
//! mesh, peers on different paths never see each other.

mod mailbox;
mod route;

pub use mailbox::{MailboxRegistry, SignalEvent};
pub use route::create_signaling_route;
