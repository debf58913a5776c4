use peerchess_core::{CallRole, OccupancyRules};
use peerchess_p2p::GameEvent;

const HELP: [&str; 4] = [
    "Enter moves in coordinate notation (e2e4, e7e8q)",
    "  board  show the board",
    "  help   show this help",
    "  quit   leave the game",
];

/// Renders game events as console lines
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePresenter;

impl ConsolePresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, event: &GameEvent) -> Vec<String> {
        match event {
            GameEvent::IdentityAssigned(identity) => {
                vec![format!("🔑 Signalling identity: {}", identity)]
            }
            GameEvent::RoomCreated(room) => vec![
                format!("🏠 Room created: {}", room),
                format!("   Share it: peerchess join {}", room),
                "   Waiting for an opponent...".to_string(),
            ],
            GameEvent::RoomJoined { room, host } => {
                vec![format!("🚪 Joined room {} (host {})", room, host)]
            }
            GameEvent::Connected { remote } => vec![format!("🤝 Connected to {}", remote)],
            GameEvent::LocalMediaSettled { has_media } => vec![if *has_media {
                "🎥 Local media ready".to_string()
            } else {
                "🎥 No local media".to_string()
            }],
            GameEvent::CallEstablished(call) => {
                let direction = match call.role {
                    CallRole::Caller => "placed",
                    _ => "answered",
                };
                vec![format!(
                    "📞 Call {} (opponent media: {})",
                    direction,
                    yes_no(call.remote_has_media)
                )]
            }
            GameEvent::CallSkipped => vec!["📵 No media on either side, playing without a call".to_string()],
            GameEvent::GameStarted { local_side } => vec![
                format!("♟️ Game started, you play {}", local_side),
                "   Type 'help' for commands".to_string(),
            ],
            GameEvent::MoveApplied {
                applied,
                local,
                turn,
            } => {
                let who = if *local { "You" } else { "Opponent" };
                let capture = applied
                    .captured
                    .map(|piece| format!(" capturing {}", piece))
                    .unwrap_or_default();
                let next = if turn.is_local_turn() {
                    "Your move"
                } else {
                    "Waiting for the opponent"
                };
                vec![format!("{} played {}{}. {}", who, applied.mv, capture, next)]
            }
            GameEvent::MoveRejected { mv, reason, remote } => vec![if *remote {
                format!("⚠️ Ignored opponent move {}: {}", mv, reason)
            } else {
                format!("❌ {} rejected: {}", mv, reason)
            }],
            GameEvent::Disconnected => vec!["🔌 Opponent disconnected".to_string()],
        }
    }

    /// Board from white's side with a file legend
    pub fn board(&self, rules: &OccupancyRules) -> Vec<String> {
        let mut rows = rules.ascii_rows();
        rows.push("  a b c d e f g h".to_string());
        rows
    }

    pub fn help(&self) -> Vec<String> {
        HELP.iter().map(|line| line.to_string()).collect()
    }

    pub fn print_event(&self, event: &GameEvent) {
        self.print(&self.render(event));
    }

    pub fn print(&self, lines: &[String]) {
        for line in lines {
            println!("{}", line);
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
