use crate::infrastructure::{CliError, Result};
use clap::Args;
use peerchess_p2p::{IceServer, SessionConfig, StaticMediaDevices};
use tracing::info;

/// Server, ICE and device options shared by every game command
#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Signalling server (`host[:port]`)
    #[arg(long, env = "PEERCHESS_SIGNALLING_HOST", default_value = "localhost:3536")]
    pub signalling_host: String,

    /// Room server (`host[:port]`)
    #[arg(long, env = "PEERCHESS_ROOM_HOST", default_value = "localhost:3537")]
    pub room_host: String,

    /// Connect with wss:// instead of ws://
    #[arg(long)]
    pub secure: bool,

    /// Namespace for mailboxes on a shared signalling server
    #[arg(long, env = "PEERCHESS_APP_KEY", default_value = "peerchess")]
    pub app_key: String,

    /// Comma separated STUN URLs (default: Google STUN)
    #[arg(long, env = "PEERCHESS_STUN")]
    pub stun: Option<String>,

    /// TURN server URL (format: turn:host:port)
    #[arg(long)]
    pub turn_server: Option<String>,

    /// TURN username (required if turn-server is set)
    #[arg(long)]
    pub turn_username: Option<String>,

    /// TURN credential (required if turn-server is set)
    #[arg(long)]
    pub turn_credential: Option<String>,

    /// How often the session polls the transport, in milliseconds
    #[arg(long, env = "PEERCHESS_POLL_INTERVAL_MS", default_value_t = 20)]
    pub poll_interval_ms: u64,

    /// Offer a camera to the opponent
    #[arg(long)]
    pub camera: bool,

    /// Offer a microphone to the opponent
    #[arg(long)]
    pub microphone: bool,
}

impl ConnectArgs {
    /// Layer these options over `config`; `--secure` can only tighten it
    pub fn apply(&self, config: SessionConfig) -> Result<SessionConfig> {
        let mut config = config
            .with_room_host(&self.room_host)
            .with_poll_interval(self.poll_interval_ms);
        config.signalling_host = self.signalling_host.clone();
        config.app_key = self.app_key.clone();
        config.secure |= self.secure;

        let mut ice_servers = match &self.stun {
            Some(list) => IceServer::parse_stun_list(list)
                .map(|server| vec![server])
                .ok_or_else(|| CliError::InvalidConfig("empty STUN server list".to_string()))?,
            None => IceServer::default_stun_servers(),
        };

        if let Some(turn_url) = &self.turn_server {
            match (&self.turn_username, &self.turn_credential) {
                (Some(username), Some(credential)) => {
                    info!("Using TURN server: {}", turn_url);
                    ice_servers.push(IceServer::turn(turn_url, username, credential));
                }
                _ => {
                    return Err(CliError::InvalidConfig(
                        "TURN server requires both username and credential".to_string(),
                    ));
                }
            }
        }

        Ok(config.with_ice_servers(ice_servers))
    }

    pub fn config(&self) -> Result<SessionConfig> {
        self.apply(SessionConfig::default())
    }

    pub fn devices(&self) -> StaticMediaDevices {
        StaticMediaDevices::granted(self.microphone, self.camera)
    }
}
