use crate::application::ConnectionEvent;
use crate::domain::{PeerId, PeerIdentity};
use crate::infrastructure::error::{Result, SessionError};
use crate::infrastructure::transport::Transport;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory rendezvous + data channel bus.
///
/// Simulates the signalling server's full-mesh mailboxes: every endpoint
/// sitting in the same mailbox sees every other one connect, and bytes are
/// delivered synchronously and in order.
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    inner: Arc<Mutex<NetworkState>>,
}

#[derive(Default)]
struct NetworkState {
    /// Mailbox name -> endpoints currently inside it
    mailboxes: HashMap<PeerIdentity, Vec<PeerId>>,
    /// Which mailbox each endpoint sits in
    locations: HashMap<PeerId, PeerIdentity>,
    inboxes: HashMap<PeerId, VecDeque<ConnectionEvent>>,
}

impl NetworkState {
    fn enter(&mut self, peer: PeerId, mailbox: &PeerIdentity) {
        let members = self.mailboxes.entry(mailbox.clone()).or_default();
        let existing: Vec<PeerId> = members.clone();
        members.push(peer);
        self.locations.insert(peer, mailbox.clone());

        for other in existing {
            self.push(peer, ConnectionEvent::PeerConnected(other));
            self.push(other, ConnectionEvent::PeerConnected(peer));
        }
    }

    fn leave(&mut self, peer: PeerId) {
        let Some(mailbox) = self.locations.remove(&peer) else {
            return;
        };

        let remaining = match self.mailboxes.get_mut(&mailbox) {
            Some(members) => {
                members.retain(|id| *id != peer);
                members.clone()
            }
            None => Vec::new(),
        };

        for other in remaining {
            self.push(other, ConnectionEvent::PeerDisconnected(peer));
        }
    }

    fn push(&mut self, target: PeerId, event: ConnectionEvent) {
        self.inboxes.entry(target).or_default().push_back(event);
    }
}

impl MemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new endpoint; it registers in its own mailbox immediately
    pub fn endpoint(&self) -> MemoryTransport {
        let peer = PeerId::random();
        let identity = PeerIdentity::generate();

        self.lock().enter(peer, &identity);
        tracing::debug!("🔌 Memory endpoint {} registered as {}", peer, identity);

        MemoryTransport {
            network: self.clone(),
            peer,
            identity,
            attached: true,
        }
    }

    /// Number of endpoints currently attached to `mailbox`
    pub fn occupancy(&self, mailbox: &PeerIdentity) -> usize {
        self.lock().mailboxes.get(mailbox).map_or(0, Vec::len)
    }

    fn lock(&self) -> MutexGuard<'_, NetworkState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One endpoint of a [`MemoryNetwork`]
pub struct MemoryTransport {
    network: MemoryNetwork,
    peer: PeerId,
    identity: PeerIdentity,
    attached: bool,
}

impl MemoryTransport {
    pub fn peer_id(&self) -> PeerId {
        self.peer
    }

    /// Drop off the network; peers sharing the mailbox see a disconnect
    pub fn disconnect(&mut self) {
        if self.attached {
            self.attached = false;
            self.network.lock().leave(self.peer);
            tracing::debug!("🔌 Memory endpoint {} detached", self.peer);
        }
    }
}

impl Transport for MemoryTransport {
    fn local_identity(&mut self) -> Option<PeerIdentity> {
        self.attached.then(|| self.identity.clone())
    }

    fn dial(&mut self, remote: &PeerIdentity) -> Result<()> {
        if !self.attached {
            return Err(SessionError::ConnectionFailed(
                "endpoint is detached".to_string(),
            ));
        }

        let mut network = self.network.lock();
        network.leave(self.peer);
        network.enter(self.peer, remote);
        Ok(())
    }

    fn send_to(&mut self, peer: PeerId, data: Vec<u8>) -> Result<()> {
        let mut network = self.network.lock();

        let same_mailbox = match (network.locations.get(&self.peer), network.locations.get(&peer)) {
            (Some(ours), Some(theirs)) => ours == theirs,
            _ => false,
        };
        if !same_mailbox {
            return Err(SessionError::SendFailed(format!(
                "peer {} is not reachable",
                peer
            )));
        }

        network.push(
            peer,
            ConnectionEvent::MessageReceived {
                from: self.peer,
                data,
            },
        );
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<ConnectionEvent> {
        self.network
            .lock()
            .inboxes
            .get_mut(&self.peer)
            .map(|inbox| inbox.drain(..).collect())
            .unwrap_or_default()
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dial_connects_both_sides() {
        let network = MemoryNetwork::new();
        let mut host = network.endpoint();
        let mut guest = network.endpoint();

        let host_identity = host.local_identity().unwrap();
        guest.dial(&host_identity).unwrap();

        assert!(matches!(
            host.poll_events().as_slice(),
            [ConnectionEvent::PeerConnected(peer)] if *peer == guest.peer_id()
        ));
        assert!(matches!(
            guest.poll_events().as_slice(),
            [ConnectionEvent::PeerConnected(peer)] if *peer == host.peer_id()
        ));
        assert_eq!(network.occupancy(&host_identity), 2);
    }

    #[test]
    fn test_messages_arrive_in_order() {
        let network = MemoryNetwork::new();
        let mut host = network.endpoint();
        let mut guest = network.endpoint();
        guest.dial(&host.local_identity().unwrap()).unwrap();
        host.poll_events();

        for i in 0..3u8 {
            guest.send_to(host.peer_id(), vec![i]).unwrap();
        }

        let payloads: Vec<Vec<u8>> = host
            .poll_events()
            .into_iter()
            .filter_map(|event| match event {
                ConnectionEvent::MessageReceived { data, .. } => Some(data),
                _ => None,
            })
            .collect();
        assert_eq!(payloads, vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn test_send_outside_mailbox_fails() {
        let network = MemoryNetwork::new();
        let mut a = network.endpoint();
        let b = network.endpoint();

        assert!(matches!(
            a.send_to(b.peer_id(), vec![1]),
            Err(SessionError::SendFailed(_))
        ));
    }

    #[test]
    fn test_drop_notifies_remote() {
        let network = MemoryNetwork::new();
        let mut host = network.endpoint();
        let mut guest = network.endpoint();
        let guest_peer = guest.peer_id();
        guest.dial(&host.local_identity().unwrap()).unwrap();
        host.poll_events();

        drop(guest);

        assert!(matches!(
            host.poll_events().as_slice(),
            [ConnectionEvent::PeerDisconnected(peer)] if *peer == guest_peer
        ));
    }
}
