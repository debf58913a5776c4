use cucumber::World;
use peerchess_core::{ChessMove, OccupancyRules, Role, RoomId};
use peerchess_p2p::{
    Game, GameEvent, GameOrchestrator, MemoryNetwork, MemoryRoomConnection, MemoryRoomStore,
    MemoryTransport, PeerIdentity, RoomCoordinator, RoomError, SessionConfig, SessionError,
    StaticMediaDevices,
};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type Events = Arc<Mutex<Vec<GameEvent>>>;
pub type TestGame = Game<MemoryTransport, OccupancyRules>;

/// One side of a running match and everything its orchestrator emitted
pub struct Player {
    pub game: TestGame,
    pub events: Events,
}

impl Player {
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Remote moves this player has applied so far
    pub fn remote_moves(&self) -> Vec<ChessMove> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                GameEvent::MoveApplied {
                    applied,
                    local: false,
                    ..
                } => Some(applied.mv),
                _ => None,
            })
            .collect()
    }

    /// Poll for a short while so in-flight frames arrive
    pub async fn settle(&mut self) {
        for _ in 0..20 {
            self.game.poll();
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }
}

#[derive(World)]
#[world(init = Self::new)]
pub struct ChessWorld {
    pub store: MemoryRoomStore,
    pub host_rooms: Option<RoomCoordinator<MemoryRoomConnection>>,
    pub room: Option<RoomId>,
    pub joined_host: Option<PeerIdentity>,
    pub join_error: Option<RoomError>,

    pub host_media: StaticMediaDevices,
    pub guest_media: StaticMediaDevices,
    pub host: Option<Player>,
    pub guest: Option<Player>,
    pub last_error: Option<SessionError>,
}

impl fmt::Debug for ChessWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChessWorld")
            .field("rooms", &self.store.len())
            .field("room", &self.room)
            .field("joined_host", &self.joined_host)
            .field("join_error", &self.join_error)
            .field("match_running", &self.host.is_some())
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl ChessWorld {
    pub fn new() -> Self {
        Self {
            store: MemoryRoomStore::new(),
            host_rooms: None,
            room: None,
            joined_host: None,
            join_error: None,
            host_media: StaticMediaDevices::denied(),
            guest_media: StaticMediaDevices::denied(),
            host: None,
            guest: None,
            last_error: None,
        }
    }

    pub fn coordinator(&self) -> RoomCoordinator<MemoryRoomConnection> {
        RoomCoordinator::new(self.store.connection(), 8)
    }

    pub fn player(&mut self, role: Role) -> &mut Player {
        let player = match role {
            Role::Host => self.host.as_mut(),
            Role::Guest => self.guest.as_mut(),
        };
        player.expect("match is running")
    }

    /// Run host and guest orchestrators against each other until both games
    /// have started
    pub async fn start_match(&mut self) {
        let network = MemoryNetwork::new();
        let host_events: Events = Arc::default();
        let guest_events: Events = Arc::default();
        let published: Arc<Mutex<Option<RoomId>>> = Arc::default();

        let host_log = host_events.clone();
        let room_slot = published.clone();
        let host = GameOrchestrator::new(fast_config(), self.store.connection(), self.host_media)
            .on_event(move |event| {
                if let GameEvent::RoomCreated(room) = event {
                    *room_slot.lock().unwrap() = Some(room.clone());
                }
                host_log.lock().unwrap().push(event.clone());
            });

        let guest_log = guest_events.clone();
        let guest = GameOrchestrator::new(fast_config(), self.store.connection(), self.guest_media)
            .on_event(move |event| guest_log.lock().unwrap().push(event.clone()));

        let host_transport = network.endpoint();
        let guest_transport = network.endpoint();

        let guest_flow = async {
            let room = loop {
                if let Some(room) = published.lock().unwrap().clone() {
                    break room;
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
            };
            guest
                .join(guest_transport, &room, OccupancyRules::new())
                .await
        };

        let (host_game, guest_game) = tokio::join!(
            host.host(host_transport, OccupancyRules::new()),
            guest_flow
        );

        self.room = published.lock().unwrap().clone();
        self.host = Some(Player {
            game: host_game.expect("host game starts"),
            events: host_events,
        });
        self.guest = Some(Player {
            game: guest_game.expect("guest game starts"),
            events: guest_events,
        });
    }

    pub fn play(&mut self, role: Role, notation: &str) {
        let mv = ChessMove::parse_coordinate(notation).expect("valid notation");
        self.last_error = self.player(role).game.play_local(mv).err();
    }
}

pub fn fast_config() -> SessionConfig {
    SessionConfig {
        poll_interval_ms: 1,
        bootstrap_timeout: Some(Duration::from_secs(2)),
        listen_timeout: Some(Duration::from_secs(2)),
        connect_timeout: Some(Duration::from_secs(2)),
        negotiate_timeout: Some(Duration::from_secs(2)),
        ..Default::default()
    }
}

pub fn parse_role(word: &str) -> Role {
    match word {
        "host" => Role::Host,
        "guest" => Role::Guest,
        other => panic!("unknown player '{}'", other),
    }
}

pub fn parse_media(word: &str) -> StaticMediaDevices {
    match word {
        "camera" => StaticMediaDevices::granted(true, true),
        "no camera" => StaticMediaDevices::denied(),
        other => panic!("unknown media setting '{}'", other),
    }
}
