use crate::domain::ChessMove;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Application message envelope multiplexed over the session channel.
///
/// Every frame is a JSON object whose `event` field names the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event")]
pub enum SessionMessage {
    /// Local media acquisition settled (granted or denied)
    #[serde(rename = "mediarequestcomplete")]
    MediaRequestComplete {
        #[serde(rename = "hasMedia")]
        has_media: bool,
    },

    #[serde(rename = "chessmove")]
    ChessMove {
        #[serde(rename = "move")]
        mv: ChessMove,
    },

    /// Caller offers its stream
    #[serde(rename = "mediacall")]
    MediaCall {
        #[serde(rename = "streamId")]
        stream_id: String,
    },

    /// Callee accepted the call; `hasStream` tells whether it sends media back
    #[serde(rename = "mediaanswer")]
    MediaAnswer {
        #[serde(rename = "hasStream")]
        has_stream: bool,
        #[serde(rename = "streamId", default, skip_serializing_if = "Option::is_none")]
        stream_id: Option<String>,
    },
}

impl SessionMessage {
    /// Event names this build understands
    pub const KNOWN_EVENTS: [&'static str; 4] =
        ["mediarequestcomplete", "chessmove", "mediacall", "mediaanswer"];

    pub fn event_name(&self) -> &'static str {
        match self {
            SessionMessage::MediaRequestComplete { .. } => "mediarequestcomplete",
            SessionMessage::ChessMove { .. } => "chessmove",
            SessionMessage::MediaCall { .. } => "mediacall",
            SessionMessage::MediaAnswer { .. } => "mediaanswer",
        }
    }

    pub fn is_known_event(event: &str) -> bool {
        Self::KNOWN_EVENTS.contains(&event)
    }
}
