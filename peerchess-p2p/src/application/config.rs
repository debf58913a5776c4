use crate::domain::{IceServer, PeerIdentity};
use instant::Duration;
use peerchess_core::{RoomId, RoomIdError};

/// Configuration for a peer-to-peer game session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Matchbox signalling server (`host[:port]`, no scheme)
    pub signalling_host: String,

    /// Room server (`host[:port]`, no scheme)
    pub room_host: String,

    /// Use `wss://` instead of `ws://`
    pub secure: bool,

    /// Namespaces mailboxes on a shared signalling server
    pub app_key: String,

    pub ice_servers: Vec<IceServer>,

    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,

    /// Frames held back until the connection opens
    pub queue_capacity: usize,

    pub bootstrap_timeout: Option<Duration>,
    pub listen_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub negotiate_timeout: Option<Duration>,

    /// Room id generation attempts before giving up
    pub room_attempts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            signalling_host: "localhost:3536".to_string(),
            room_host: "localhost:3537".to_string(),
            secure: false,
            app_key: "peerchess".to_string(),
            ice_servers: IceServer::default_stun_servers(),
            poll_interval_ms: 20,
            queue_capacity: 256,
            bootstrap_timeout: Some(Duration::from_secs(10)),
            listen_timeout: None,
            connect_timeout: Some(Duration::from_secs(30)),
            negotiate_timeout: Some(Duration::from_secs(120)),
            room_attempts: 8,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Unsupported launch URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid room in launch URL: {0}")]
    InvalidRoom(#[from] RoomIdError),
}

impl SessionConfig {
    pub fn new(signalling_host: impl Into<String>) -> Self {
        Self {
            signalling_host: signalling_host.into(),
            ..Default::default()
        }
    }

    /// Derive transport security and the room to join from the page URL.
    ///
    /// `https://…` selects `wss://`; the fragment (`#ab12cd`) names the room.
    /// No fragment means this peer hosts.
    pub fn from_launch_url(url: &str) -> Result<(Self, Option<RoomId>), ConfigError> {
        let (scheme, rest) = url
            .split_once("://")
            .ok_or_else(|| ConfigError::UnsupportedScheme(url.to_string()))?;

        let secure = match scheme.to_ascii_lowercase().as_str() {
            "https" => true,
            "http" | "file" => false,
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        };

        let room = match rest.split_once('#') {
            Some((_, fragment)) => RoomId::from_fragment(fragment)?,
            None => None,
        };

        let config = Self {
            secure,
            ..Default::default()
        };
        Ok((config, room))
    }

    pub fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    pub fn with_ice_servers(mut self, ice_servers: Vec<IceServer>) -> Self {
        self.ice_servers = ice_servers;
        self
    }

    pub fn with_room_host(mut self, room_host: impl Into<String>) -> Self {
        self.room_host = room_host.into();
        self
    }

    fn ws_scheme(&self) -> &'static str {
        if self.secure {
            "wss"
        } else {
            "ws"
        }
    }

    pub fn signalling_url(&self) -> String {
        format!("{}://{}", self.ws_scheme(), self.signalling_host)
    }

    /// Rendezvous room owned by `identity`
    pub fn mailbox_url(&self, identity: &PeerIdentity) -> String {
        format!("{}/{}_{}", self.signalling_url(), self.app_key, identity)
    }

    pub fn room_server_url(&self) -> String {
        format!("{}://{}/rooms", self.ws_scheme(), self.room_host)
    }
}
