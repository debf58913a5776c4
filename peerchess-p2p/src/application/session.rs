use crate::application::listeners::{ListenerId, ListenerRegistry};
use crate::application::runtime::{platform_sleep, OutboundQueue, QueueError};
use crate::application::{ConnectionEvent, SessionConfig};
use crate::domain::{ConnectionState, PeerId, PeerIdentity};
use crate::infrastructure::error::{Result, SessionError};
use crate::infrastructure::message::{self, Decoded};
use crate::infrastructure::transport::Transport;
use instant::{Duration, Instant};
use peerchess_core::SessionMessage;

/// An established link to the remote peer
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub remote: PeerId,
    /// Known on the dialing side only
    pub remote_identity: Option<PeerIdentity>,
}

/// Two-party session over a reliable, ordered data channel.
///
/// Owns the single connection, its listener list and the outbound FIFO.
/// Messages sent before the channel opens are queued and flushed in order the
/// moment it does.
pub struct Session<T: Transport> {
    transport: T,
    config: SessionConfig,
    state: ConnectionState,
    remote_identity: Option<PeerIdentity>,
    /// Peer that arrived before `listen` was called
    early_peer: Option<PeerId>,
    outbound: OutboundQueue,
    listeners: ListenerRegistry,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T, config: SessionConfig) -> Self {
        let outbound = OutboundQueue::new(config.queue_capacity);
        Self {
            transport,
            config,
            state: ConnectionState::Idle,
            remote_identity: None,
            early_peer: None,
            outbound,
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn local_identity(&mut self) -> Option<PeerIdentity> {
        self.transport.local_identity()
    }

    /// Frames waiting for the connection to open
    pub fn queued(&self) -> usize {
        self.outbound.len()
    }

    /// Host side: wait for the first peer to reach our mailbox
    pub async fn listen(&mut self) -> Result<Connection> {
        self.begin()?;
        tracing::info!("👂 Waiting for a peer");

        if let Some(peer) = self.early_peer.take() {
            self.open(peer);
        }

        self.await_open("waiting for a peer", self.config.listen_timeout)
            .await
    }

    /// Guest side: dial the host's identity and wait for the channel
    pub async fn connect(&mut self, host: &PeerIdentity) -> Result<Connection> {
        self.begin()?;
        self.early_peer = None;

        if let Err(e) = self.transport.dial(host) {
            self.state = ConnectionState::Idle;
            return Err(e);
        }
        self.remote_identity = Some(host.clone());

        self.await_open("connecting to host", self.config.connect_timeout)
            .await
    }

    fn begin(&mut self) -> Result<()> {
        if self.state != ConnectionState::Idle {
            tracing::warn!("Connect requested while {}", self.state);
            return Err(SessionError::AlreadyConnecting);
        }
        self.state = ConnectionState::Negotiating;
        Ok(())
    }

    async fn await_open(
        &mut self,
        operation: &'static str,
        timeout: Option<Duration>,
    ) -> Result<Connection> {
        let start = Instant::now();

        loop {
            self.pump();

            if let ConnectionState::Open { remote } = self.state {
                return Ok(Connection {
                    remote,
                    remote_identity: self.remote_identity.clone(),
                });
            }

            if let Some(limit) = timeout {
                if start.elapsed() >= limit {
                    tracing::warn!("⏱️ Timed out {}", operation);
                    self.state = ConnectionState::Idle;
                    self.remote_identity = None;
                    return Err(SessionError::Timeout {
                        operation,
                        after: limit,
                    });
                }
            }

            platform_sleep(self.config.poll_interval_ms).await;
        }
    }

    /// Transmit now when open, otherwise queue for the flush on open.
    ///
    /// An error means the message was neither sent nor queued.
    pub fn send(&mut self, message: &SessionMessage) -> Result<()> {
        let frame = message::encode(message)?;

        match self.state {
            ConnectionState::Closed => Err(SessionError::Disconnected),
            ConnectionState::Open { remote } => {
                // Frames queued before the open go out first
                self.flush()?;
                self.transport.send_to(remote, frame)
            }
            ConnectionState::Idle | ConnectionState::Negotiating => {
                tracing::debug!("Queued {} until the connection opens", message.event_name());
                self.enqueue(frame)
            }
        }
    }

    fn enqueue(&mut self, frame: Vec<u8>) -> Result<()> {
        self.outbound.push(frame).map_err(|e| match e {
            QueueError::Full { max } => SessionError::QueueFull { max },
        })
    }

    /// Send queued frames in order; a frame leaves the queue only once sent
    fn flush(&mut self) -> Result<()> {
        let Some(remote) = self.state.remote() else {
            return Ok(());
        };

        let mut sent = 0;
        while let Some(frame) = self.outbound.front() {
            self.transport.send_to(remote, frame.clone())?;
            self.outbound.pop();
            sent += 1;
        }

        if sent > 1 {
            tracing::debug!("📤 Flushed {} queued messages", sent);
        }
        Ok(())
    }

    pub fn add_listener<F>(&self, once: bool, callback: F) -> ListenerId
    where
        F: FnMut(&SessionMessage) + Send + 'static,
    {
        self.listeners.add(once, callback)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Shared handle to the listener list
    pub fn listeners(&self) -> ListenerRegistry {
        self.listeners.clone()
    }

    /// Drain the transport and dispatch inbound messages.
    ///
    /// Returns the number of messages dispatched. A remote drop moves the
    /// session to `Closed`.
    pub fn poll(&mut self) -> usize {
        let dispatched = self.pump();

        if self.state.is_open() && !self.outbound.is_empty() {
            if let Err(e) = self.flush() {
                tracing::warn!("Flush failed, {} frames kept: {}", self.outbound.len(), e);
            }
        }

        dispatched
    }

    /// Poll until `done` holds, the remote drops, or `timeout` elapses
    pub async fn poll_until<F>(
        &mut self,
        operation: &'static str,
        timeout: Option<Duration>,
        mut done: F,
    ) -> Result<()>
    where
        F: FnMut() -> bool,
    {
        let start = Instant::now();

        loop {
            self.poll();

            if done() {
                return Ok(());
            }
            if self.state.is_closed() {
                return Err(SessionError::Disconnected);
            }
            if let Some(limit) = timeout {
                if start.elapsed() >= limit {
                    return Err(SessionError::Timeout {
                        operation,
                        after: limit,
                    });
                }
            }

            platform_sleep(self.config.poll_interval_ms).await;
        }
    }

    fn pump(&mut self) -> usize {
        let mut dispatched = 0;

        for event in self.transport.poll_events() {
            match event {
                ConnectionEvent::PeerConnected(peer) => self.on_peer_connected(peer),
                ConnectionEvent::PeerDisconnected(peer) => self.on_peer_disconnected(peer),
                ConnectionEvent::MessageReceived { from, data } => {
                    if self.state.remote() == Some(from) {
                        dispatched += self.dispatch(&data);
                    } else {
                        tracing::warn!("Dropped {} bytes from unexpected peer {}", data.len(), from);
                    }
                }
            }
        }

        dispatched
    }

    fn on_peer_connected(&mut self, peer: PeerId) {
        match self.state {
            ConnectionState::Negotiating => self.open(peer),
            ConnectionState::Idle => {
                tracing::debug!("Peer {} arrived before listen", peer);
                if self.early_peer.is_none() {
                    self.early_peer = Some(peer);
                }
            }
            ConnectionState::Open { .. } | ConnectionState::Closed => {
                tracing::warn!("🚫 Ignoring extra peer {} (session is {})", peer, self.state);
            }
        }
    }

    fn on_peer_disconnected(&mut self, peer: PeerId) {
        if self.state.remote() == Some(peer) {
            tracing::info!("🔌 Remote peer {} disconnected", peer);
            self.state = ConnectionState::Closed;
        } else if self.early_peer == Some(peer) {
            self.early_peer = None;
        }
    }

    fn open(&mut self, remote: PeerId) {
        tracing::info!("🟢 Connection open with {}", remote);
        self.state = ConnectionState::Open { remote };

        if let Err(e) = self.flush() {
            tracing::warn!("Flush on open failed, {} frames kept: {}", self.outbound.len(), e);
        }
    }

    fn dispatch(&mut self, data: &[u8]) -> usize {
        match message::decode(data) {
            Ok(Decoded::Message(message)) => {
                tracing::debug!("📥 {}", message.event_name());
                self.listeners.dispatch(&message);
                1
            }
            Ok(Decoded::Unrecognized(event)) => {
                tracing::warn!("Ignoring unrecognized event '{}'", event);
                0
            }
            Err(e) => {
                tracing::warn!("Ignoring frame: {}", e);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory_transport::MemoryNetwork;

    #[test]
    fn test_send_before_open_is_queued() {
        let network = MemoryNetwork::new();
        let mut session = Session::new(network.endpoint(), SessionConfig::default());

        session
            .send(&SessionMessage::MediaRequestComplete { has_media: false })
            .unwrap();

        assert_eq!(session.queued(), 1);
        assert_eq!(session.state(), ConnectionState::Idle);
    }

    #[test]
    fn test_queue_full_is_reported() {
        let network = MemoryNetwork::new();
        let config = SessionConfig {
            queue_capacity: 1,
            ..Default::default()
        };
        let mut session = Session::new(network.endpoint(), config);
        let message = SessionMessage::MediaRequestComplete { has_media: false };

        session.send(&message).unwrap();
        assert!(matches!(
            session.send(&message),
            Err(SessionError::QueueFull { max: 1 })
        ));
    }
}
