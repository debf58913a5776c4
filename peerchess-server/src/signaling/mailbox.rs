use crate::error::SignalingError;
use matchbox_protocol::{PeerEvent, PeerId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Event pushed to a connected peer
pub type SignalEvent = PeerEvent<serde_json::Value>;

type Mailboxes = HashMap<String, HashMap<PeerId, Sender<SignalEvent>>>;

/// Connected peers grouped by mailbox
#[derive(Clone, Debug, Default)]
pub struct MailboxRegistry {
    mailboxes: Arc<RwLock<Mailboxes>>,
}

impl MailboxRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `peer` its id and announce it to everyone already in `mailbox`.
    ///
    /// Existing peers receive `NewPeer` and start the WebRTC offer towards
    /// the newcomer.
    #[instrument(skip(self, sender))]
    pub async fn join(
        &self,
        mailbox: &str,
        peer: PeerId,
        sender: Sender<SignalEvent>,
    ) -> Result<(), SignalingError> {
        sender
            .send(PeerEvent::IdAssigned(peer))
            .await
            .map_err(|_| SignalingError::ChannelClosed)?;

        let (announced, occupancy) = {
            let mut mailboxes = self.mailboxes.write().await;
            let peers = mailboxes.entry(mailbox.to_string()).or_default();
            let existing = snapshot(peers);
            peers.insert(peer, sender);
            (existing, peers.len())
        };
        info!(mailbox, ?peer, occupancy, "Peer joined mailbox");

        // Announce outside the lock
        for (existing, existing_sender) in announced {
            if existing_sender.send(PeerEvent::NewPeer(peer)).await.is_err() {
                warn!(?existing, "Failed to announce new peer");
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn leave(&self, mailbox: &str, peer: PeerId) {
        let remaining = {
            let mut mailboxes = self.mailboxes.write().await;
            let Some(peers) = mailboxes.get_mut(mailbox) else {
                return;
            };

            if peers.remove(&peer).is_none() {
                return;
            }

            let remaining = snapshot(peers);
            if peers.is_empty() {
                mailboxes.remove(mailbox);
                debug!(mailbox, "Removed empty mailbox");
            }
            remaining
        };
        info!(mailbox, ?peer, "Peer left mailbox");

        for (_, remaining_sender) in remaining {
            if remaining_sender.send(PeerEvent::PeerLeft(peer)).await.is_err() {
                debug!("Remaining peer already gone");
            }
        }
    }

    /// Relay an SDP/ICE payload from `sender` to `receiver` in the same mailbox
    #[instrument(skip(self, data))]
    pub async fn forward(
        &self,
        mailbox: &str,
        sender: PeerId,
        receiver: PeerId,
        data: serde_json::Value,
    ) -> Result<(), SignalingError> {
        let target = {
            let mailboxes = self.mailboxes.read().await;
            let peers = mailboxes
                .get(mailbox)
                .ok_or_else(|| SignalingError::MailboxNotFound(mailbox.to_string()))?;
            peers
                .get(&receiver)
                .cloned()
                .ok_or(SignalingError::RecipientNotFound(receiver))?
        };

        target
            .send(PeerEvent::Signal { sender, data })
            .await
            .map_err(|_| SignalingError::ChannelClosed)?;
        debug!(?sender, ?receiver, "Signal forwarded");
        Ok(())
    }

    pub async fn occupancy(&self, mailbox: &str) -> usize {
        self.mailboxes
            .read()
            .await
            .get(mailbox)
            .map_or(0, HashMap::len)
    }
}

fn snapshot(peers: &HashMap<PeerId, Sender<SignalEvent>>) -> Vec<(PeerId, Sender<SignalEvent>)> {
    peers
        .iter()
        .map(|(id, sender)| (*id, sender.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc::{self, Receiver};
    use tokio::time::timeout;
    use uuid::Uuid;

    fn peer() -> (PeerId, Sender<SignalEvent>, Receiver<SignalEvent>) {
        let (tx, rx) = mpsc::channel(8);
        (PeerId(Uuid::new_v4()), tx, rx)
    }

    #[tokio::test]
    async fn test_join_assigns_id_and_announces() {
        let registry = MailboxRegistry::new();
        let (host, host_tx, mut host_rx) = peer();
        let (guest, guest_tx, mut guest_rx) = peer();

        registry.join("peerchess_a", host, host_tx).await.unwrap();
        assert!(matches!(host_rx.recv().await, Some(PeerEvent::IdAssigned(id)) if id == host));

        registry.join("peerchess_a", guest, guest_tx).await.unwrap();
        assert!(matches!(guest_rx.recv().await, Some(PeerEvent::IdAssigned(id)) if id == guest));
        assert!(matches!(host_rx.recv().await, Some(PeerEvent::NewPeer(id)) if id == guest));

        assert_eq!(registry.occupancy("peerchess_a").await, 2);
    }

    #[tokio::test]
    async fn test_mailboxes_are_isolated() {
        let registry = MailboxRegistry::new();
        let (a, a_tx, mut a_rx) = peer();
        let (b, b_tx, _b_rx) = peer();

        registry.join("peerchess_a", a, a_tx).await.unwrap();
        registry.join("peerchess_b", b, b_tx).await.unwrap();

        a_rx.recv().await.unwrap();
        assert!(a_rx.try_recv().is_err());

        assert_eq!(
            registry
                .forward("peerchess_a", a, b, serde_json::json!({}))
                .await,
            Err(SignalingError::RecipientNotFound(b))
        );
    }

    #[tokio::test]
    async fn test_forward_signal() {
        let registry = MailboxRegistry::new();
        let (host, host_tx, _host_rx) = peer();
        let (guest, guest_tx, mut guest_rx) = peer();
        registry.join("peerchess_a", host, host_tx).await.unwrap();
        registry.join("peerchess_a", guest, guest_tx).await.unwrap();
        guest_rx.recv().await.unwrap();

        registry
            .forward("peerchess_a", host, guest, serde_json::json!({"Offer": "sdp"}))
            .await
            .unwrap();

        match guest_rx.recv().await {
            Some(PeerEvent::Signal { sender, data }) => {
                assert_eq!(sender, host);
                assert_eq!(data["Offer"], "sdp");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_leave_notifies_and_cleans_up() {
        let registry = MailboxRegistry::new();
        let (host, host_tx, mut host_rx) = peer();
        let (guest, guest_tx, _guest_rx) = peer();
        registry.join("peerchess_a", host, host_tx).await.unwrap();
        registry.join("peerchess_a", guest, guest_tx).await.unwrap();
        host_rx.recv().await.unwrap();
        host_rx.recv().await.unwrap();

        registry.leave("peerchess_a", guest).await;
        assert!(matches!(host_rx.recv().await, Some(PeerEvent::PeerLeft(id)) if id == guest));

        registry.leave("peerchess_a", host).await;
        assert_eq!(registry.occupancy("peerchess_a").await, 0);
        assert!(matches!(
            registry
                .forward("peerchess_a", host, guest, serde_json::Value::Null)
                .await,
            Err(SignalingError::MailboxNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stalled_peer_does_not_block_the_registry() {
        let registry = MailboxRegistry::new();

        // A peer whose socket writer stopped reading: one slot, already full
        let (slow_tx, _slow_rx) = mpsc::channel(1);
        let slow = PeerId(Uuid::new_v4());
        registry.join("peerchess_a", slow, slow_tx).await.unwrap();

        let stalled = tokio::spawn({
            let registry = registry.clone();
            async move {
                registry
                    .forward("peerchess_a", PeerId(Uuid::new_v4()), slow, serde_json::json!({}))
                    .await
            }
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!stalled.is_finished());

        let (other, other_tx, mut other_rx) = peer();
        timeout(Duration::from_secs(1), registry.join("peerchess_b", other, other_tx))
            .await
            .expect("join waited on the stalled peer")
            .unwrap();
        assert!(matches!(other_rx.recv().await, Some(PeerEvent::IdAssigned(_))));

        timeout(Duration::from_secs(1), registry.leave("peerchess_b", other))
            .await
            .expect("leave waited on the stalled peer");
        assert_eq!(registry.occupancy("peerchess_a").await, 1);

        stalled.abort();
    }
}
