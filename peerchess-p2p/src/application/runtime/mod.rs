mod outbound_queue;
mod timing;

pub use outbound_queue::{OutboundQueue, QueueError};
pub use timing::platform_sleep;
