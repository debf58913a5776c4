use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Part this peer plays in the media call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallRole {
    /// Places the call and supplies the initiating stream
    Caller,
    /// Answers the call, with or without a stream of its own
    Callee,
    /// Neither side has media; no call is placed
    NoCall,
}

impl CallRole {
    /// Decide call direction once both sides reported their media presence.
    ///
    /// The initiator must supply a stream, so the host calls whenever it has
    /// media and the guest calls only when it is the sole side with media.
    pub fn resolve(is_host: bool, local_has_media: bool, remote_has_media: bool) -> Self {
        let (host_has_media, guest_has_media) = if is_host {
            (local_has_media, remote_has_media)
        } else {
            (remote_has_media, local_has_media)
        };

        match (host_has_media, guest_has_media) {
            (false, false) => CallRole::NoCall,
            (true, _) if is_host => CallRole::Caller,
            (false, true) if !is_host => CallRole::Caller,
            _ => CallRole::Callee,
        }
    }

    pub fn is_caller(&self) -> bool {
        matches!(self, CallRole::Caller)
    }
}

impl fmt::Display for CallRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallRole::Caller => write!(f, "caller"),
            CallRole::Callee => write!(f, "callee"),
            CallRole::NoCall => write!(f, "no call"),
        }
    }
}

/// Devices requested when acquiring local media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// Handle to locally captured camera/microphone media
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalStream {
    pub id: String,
    pub audio: bool,
    pub video: bool,
}

impl LocalStream {
    pub fn new(constraints: MediaConstraints) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            audio: constraints.audio,
            video: constraints.video,
        }
    }
}

/// Outcome of call negotiation as seen by one peer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCallSession {
    pub role: CallRole,
    pub local_has_media: bool,
    pub remote_has_media: bool,
    /// Stream the remote side contributes, if any
    pub remote_stream_id: Option<String>,
}

impl MediaCallSession {
    pub fn is_caller(&self) -> bool {
        self.role.is_caller()
    }

    /// Media flows in one direction only
    pub fn is_one_way(&self) -> bool {
        self.local_has_media != self.remote_has_media
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_with_media_always_calls() {
        assert_eq!(CallRole::resolve(true, true, true), CallRole::Caller);
        assert_eq!(CallRole::resolve(true, true, false), CallRole::Caller);
    }

    #[test]
    fn test_guest_calls_only_when_host_has_none() {
        assert_eq!(CallRole::resolve(false, true, false), CallRole::Caller);
        assert_eq!(CallRole::resolve(false, true, true), CallRole::Callee);
    }

    #[test]
    fn test_side_without_media_answers() {
        assert_eq!(CallRole::resolve(true, false, true), CallRole::Callee);
        assert_eq!(CallRole::resolve(false, false, true), CallRole::Callee);
    }

    #[test]
    fn test_no_media_anywhere() {
        assert_eq!(CallRole::resolve(true, false, false), CallRole::NoCall);
        assert_eq!(CallRole::resolve(false, false, false), CallRole::NoCall);
    }

    #[test]
    fn test_both_sides_agree_on_one_caller() {
        for host_media in [false, true] {
            for guest_media in [false, true] {
                let host = CallRole::resolve(true, host_media, guest_media);
                let guest = CallRole::resolve(false, guest_media, host_media);

                if host_media || guest_media {
                    assert!(host.is_caller() ^ guest.is_caller());
                } else {
                    assert_eq!(host, CallRole::NoCall);
                    assert_eq!(guest, CallRole::NoCall);
                }
            }
        }
    }

    #[test]
    fn test_one_way_session() {
        let session = MediaCallSession {
            role: CallRole::Callee,
            local_has_media: false,
            remote_has_media: true,
            remote_stream_id: Some("stream".to_string()),
        };
        assert!(session.is_one_way());
        assert!(!session.is_caller());
    }
}
