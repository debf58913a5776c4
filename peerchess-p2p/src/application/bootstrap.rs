use crate::application::runtime::platform_sleep;
use crate::application::SessionConfig;
use crate::domain::PeerIdentity;
use crate::infrastructure::error::{Result, SessionError};
use crate::infrastructure::transport::Transport;
use instant::{Duration, Instant};

/// Obtains the local identity from the rendezvous service
pub struct SignalingBootstrap {
    timeout: Option<Duration>,
    poll_interval_ms: u64,
}

impl SignalingBootstrap {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            timeout: config.bootstrap_timeout,
            poll_interval_ms: config.poll_interval_ms,
        }
    }

    /// Suspend until the transport reports a registered identity
    pub async fn init<T: Transport>(&self, transport: &mut T) -> Result<PeerIdentity> {
        let start = Instant::now();

        loop {
            if let Some(identity) = transport.local_identity() {
                tracing::info!("🪪 Local identity {}", identity);
                return Ok(identity);
            }

            if let Some(limit) = self.timeout {
                if start.elapsed() >= limit {
                    return Err(SessionError::Timeout {
                        operation: "registering with the signalling server",
                        after: limit,
                    });
                }
            }

            platform_sleep(self.poll_interval_ms).await;
        }
    }
}
