use crate::application::{ConnectionEvent, SessionConfig};
use crate::domain::{IceServer, PeerId, PeerIdentity};
use crate::infrastructure::error::Result;
use crate::infrastructure::transport::Transport;
use matchbox_socket::{PeerState, RtcIceServerConfig, WebRtcSocket, WebRtcSocketBuilder};

/// Infrastructure adapter: WebRTC data channel via Matchbox signalling
pub struct MatchboxConnection {
    config: SessionConfig,
    identity: PeerIdentity,
    socket: WebRtcSocket,
    registered: bool,
    /// Peer updates observed while waiting for registration
    pending: Vec<ConnectionEvent>,
}

impl MatchboxConnection {
    /// Open the local mailbox on the signalling server
    pub fn open(config: &SessionConfig) -> Self {
        let identity = PeerIdentity::generate();
        let socket = open_socket(config, &identity);

        tracing::info!("📮 Opened mailbox {}", identity);

        Self {
            config: config.clone(),
            identity,
            socket,
            registered: false,
            pending: Vec::new(),
        }
    }

    fn drain_peer_updates(&mut self) {
        for (peer_id, state) in self.socket.update_peers() {
            let peer = PeerId::new(peer_id);
            match state {
                PeerState::Connected => {
                    tracing::info!("Peer connected: {}", peer);
                    self.pending.push(ConnectionEvent::PeerConnected(peer));
                }
                PeerState::Disconnected => {
                    tracing::info!("Peer disconnected: {}", peer);
                    self.pending.push(ConnectionEvent::PeerDisconnected(peer));
                }
            }
        }
    }
}

impl Transport for MatchboxConnection {
    fn local_identity(&mut self) -> Option<PeerIdentity> {
        if !self.registered {
            self.drain_peer_updates();
            if let Some(id) = self.socket.id() {
                tracing::info!("Registered as {} (peer {})", self.identity, id);
                self.registered = true;
            }
        }

        self.registered.then(|| self.identity.clone())
    }

    fn dial(&mut self, remote: &PeerIdentity) -> Result<()> {
        tracing::info!("📞 Dialing {}", remote);

        // Dropping the old socket ends its message loop
        self.socket = open_socket(&self.config, remote);
        self.pending.clear();
        Ok(())
    }

    fn send_to(&mut self, peer: PeerId, data: Vec<u8>) -> Result<()> {
        let len = data.len();
        self.socket
            .channel_mut(0)
            .send(data.into_boxed_slice(), peer.inner());

        tracing::debug!("Sent {} bytes to peer {}", len, peer);
        Ok(())
    }

    fn poll_events(&mut self) -> Vec<ConnectionEvent> {
        self.drain_peer_updates();
        let mut events = std::mem::take(&mut self.pending);

        for (peer_id, packet) in self.socket.channel_mut(0).receive() {
            let peer = PeerId::new(peer_id);
            tracing::debug!("Received {} bytes from peer {}", packet.len(), peer);

            events.push(ConnectionEvent::MessageReceived {
                from: peer,
                data: packet.to_vec(),
            });
        }

        events
    }
}

fn open_socket(config: &SessionConfig, mailbox: &PeerIdentity) -> WebRtcSocket {
    let url = config.mailbox_url(mailbox);
    tracing::debug!("Connecting to signalling server: {}", url);

    for (i, server) in config.ice_servers.iter().enumerate() {
        if server.username.is_some() {
            tracing::debug!("  ICE Server {}: {} (with auth)", i + 1, server.urls.join(", "));
        } else {
            tracing::debug!("  ICE Server {}: {}", i + 1, server.urls.join(", "));
        }
    }

    let (socket, loop_fut) = WebRtcSocketBuilder::new(url)
        .ice_server(build_ice_server_config(&config.ice_servers))
        .add_channel(matchbox_socket::ChannelConfig::reliable())
        .build();

    let matchbox_span = tracing::info_span!("matchbox::webrtc_loop", mailbox = %mailbox);

    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_futures::spawn_local(async move {
        let _enter = matchbox_span.enter();
        if let Err(e) = loop_fut.await {
            tracing::warn!("Matchbox loop ended: {:?}", e);
        }
    });

    #[cfg(not(target_arch = "wasm32"))]
    {
        #[cfg(feature = "native")]
        tokio::spawn(async move {
            let _enter = matchbox_span.enter();
            if let Err(e) = loop_fut.await {
                tracing::warn!("Matchbox loop ended: {:?}", e);
            }
        });

        #[cfg(not(feature = "native"))]
        compile_error!("Non-WASM builds require the 'native' feature to be enabled");
    }

    socket
}

/// Build ICE server configuration for Matchbox
fn build_ice_server_config(ice_servers: &[IceServer]) -> RtcIceServerConfig {
    // Matchbox takes a single ICE entry: fold every URL into it and use the
    // first credentials found
    if ice_servers.is_empty() {
        return RtcIceServerConfig::default();
    }

    let authenticated = ice_servers.iter().find(|server| server.username.is_some());

    RtcIceServerConfig {
        urls: ice_servers
            .iter()
            .flat_map(|server| server.urls.iter().cloned())
            .collect(),
        username: authenticated.and_then(|server| server.username.clone()),
        credential: authenticated.and_then(|server| server.credential.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_ice_server_config_stun_list() {
        let servers = vec![IceServer::parse_stun_list("stun:a:3478,stun:b:3478").unwrap()];

        let config = build_ice_server_config(&servers);
        assert_eq!(config.urls, vec!["stun:a:3478", "stun:b:3478"]);
        assert!(config.username.is_none());
        assert!(config.credential.is_none());
    }

    #[test]
    fn test_build_ice_server_config_with_turn() {
        let servers = vec![IceServer::turn("turn:turn.example.com:3478", "user", "pass")];

        let config = build_ice_server_config(&servers);
        assert_eq!(config.urls, vec!["turn:turn.example.com:3478"]);
        assert_eq!(config.username, Some("user".to_string()));
        assert_eq!(config.credential, Some("pass".to_string()));
    }

    #[test]
    fn test_build_ice_server_config_merges_stun_and_turn() {
        let servers = vec![
            IceServer::stun("stun:a:3478"),
            IceServer::turn("turn:t:3478", "user", "pass"),
        ];

        let config = build_ice_server_config(&servers);
        assert_eq!(config.urls, vec!["stun:a:3478", "turn:t:3478"]);
        assert_eq!(config.username, Some("user".to_string()));
    }

    #[test]
    fn test_build_ice_server_config_empty() {
        let config = build_ice_server_config(&[]);
        assert!(!config.urls.is_empty());
    }
}
