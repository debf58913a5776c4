//! Wire codec for the session envelope.

use crate::infrastructure::error::{Result, SessionError};
use peerchess_core::SessionMessage;

/// Result of decoding one inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Message(SessionMessage),
    /// Well-formed envelope carrying an event this build does not handle
    Unrecognized(String),
}

pub fn encode(message: &SessionMessage) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(message)?)
}

/// Decode a frame. Frames without an `event` string are malformed; unknown
/// events decode to [`Decoded::Unrecognized`].
pub fn decode(data: &[u8]) -> Result<Decoded> {
    let value: serde_json::Value = serde_json::from_slice(data)
        .map_err(|e| SessionError::MalformedEnvelope(e.to_string()))?;

    let event = value
        .get("event")
        .and_then(|event| event.as_str())
        .ok_or_else(|| SessionError::MalformedEnvelope("missing `event` field".to_string()))?;

    if !SessionMessage::is_known_event(event) {
        return Ok(Decoded::Unrecognized(event.to_string()));
    }

    serde_json::from_value(value.clone())
        .map(Decoded::Message)
        .map_err(|e| SessionError::MalformedEnvelope(e.to_string()))
}
