use crate::application::listeners::ListenerId;
use crate::application::{EventSink, GameEvent, Session};
use crate::infrastructure::error::{MediaError, Result};
use crate::infrastructure::transport::Transport;
use async_trait::async_trait;
use peerchess_core::{
    CallRole, LocalStream, MediaCallSession, MediaConstraints, Role, SessionMessage,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Source of local camera/microphone streams
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MediaDevices: Send {
    async fn acquire(
        &mut self,
        constraints: MediaConstraints,
    ) -> std::result::Result<LocalStream, MediaError>;
}

/// Fixed device availability (CLI flags, tests)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticMediaDevices {
    audio: bool,
    video: bool,
}

impl StaticMediaDevices {
    pub fn granted(audio: bool, video: bool) -> Self {
        Self { audio, video }
    }

    pub fn denied() -> Self {
        Self::granted(false, false)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MediaDevices for StaticMediaDevices {
    async fn acquire(
        &mut self,
        constraints: MediaConstraints,
    ) -> std::result::Result<LocalStream, MediaError> {
        let granted = MediaConstraints {
            audio: constraints.audio && self.audio,
            video: constraints.video && self.video,
        };

        if granted.audio || granted.video {
            Ok(LocalStream::new(granted))
        } else {
            Err(MediaError::Denied("no matching devices".to_string()))
        }
    }
}

/// Media presence of both sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presence {
    pub local: bool,
    pub remote: bool,
}

/// Counting join over the two presence arrivals: the local acquisition
/// settling and the remote notice. Repeated arrivals are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceJoin {
    remaining: u8,
    local: Option<bool>,
    remote: Option<bool>,
}

impl Default for PresenceJoin {
    fn default() -> Self {
        Self {
            remaining: 2,
            local: None,
            remote: None,
        }
    }
}

impl PresenceJoin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local_settled(&mut self, has_media: bool) {
        if self.local.is_none() {
            self.local = Some(has_media);
            self.remaining -= 1;
        }
    }

    pub fn remote_reported(&mut self, has_media: bool) {
        if self.remote.is_none() {
            self.remote = Some(has_media);
            self.remaining -= 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    pub fn presence(&self) -> Option<Presence> {
        match (self.local, self.remote) {
            (Some(local), Some(remote)) => Some(Presence { local, remote }),
            _ => None,
        }
    }
}

/// Media signaling captured from the session as it arrives
#[derive(Debug, Default)]
struct Inbox {
    remote_presence: Option<bool>,
    offer: Option<String>,
    answer: Option<(bool, Option<String>)>,
}

/// Requests local media, exchanges presence and places or answers the call.
///
/// Attach before the session connects so no media message is missed.
pub struct MediaGate {
    role: Role,
    inbox: Arc<Mutex<Inbox>>,
    listener: ListenerId,
}

impl MediaGate {
    pub fn attach<T: Transport>(session: &Session<T>, role: Role) -> Self {
        let inbox = Arc::new(Mutex::new(Inbox::default()));
        let captured = inbox.clone();

        let listener = session.add_listener(false, move |message| {
            let mut inbox = lock(&captured);
            match message {
                SessionMessage::MediaRequestComplete { has_media } => {
                    if inbox.remote_presence.is_none() {
                        inbox.remote_presence = Some(*has_media);
                    }
                }
                SessionMessage::MediaCall { stream_id } => {
                    inbox.offer = Some(stream_id.clone());
                }
                SessionMessage::MediaAnswer {
                    has_stream,
                    stream_id,
                } => {
                    inbox.answer = Some((*has_stream, stream_id.clone()));
                }
                SessionMessage::ChessMove { .. } => {}
            }
        });

        Self {
            role,
            inbox,
            listener,
        }
    }

    pub async fn acquire_local_media<D: MediaDevices>(
        devices: &mut D,
        constraints: MediaConstraints,
    ) -> std::result::Result<LocalStream, MediaError> {
        let stream = devices.acquire(constraints).await?;
        tracing::info!(
            "🎥 Local media acquired (audio: {}, video: {})",
            stream.audio,
            stream.video
        );
        Ok(stream)
    }

    /// Announce local presence and wait for the remote announcement
    pub async fn exchange_presence<T: Transport>(
        &self,
        session: &mut Session<T>,
        local: Option<&LocalStream>,
    ) -> Result<Presence> {
        let has_media = local.is_some();
        session.send(&SessionMessage::MediaRequestComplete { has_media })?;

        let mut join = PresenceJoin::new();
        join.local_settled(has_media);

        let timeout = session.config().negotiate_timeout;
        let inbox = self.inbox.clone();
        session
            .poll_until("waiting for remote media presence", timeout, || {
                if let Some(remote) = lock(&inbox).remote_presence {
                    join.remote_reported(remote);
                }
                join.is_complete()
            })
            .await?;

        let presence = join.presence().unwrap_or(Presence {
            local: has_media,
            remote: false,
        });
        tracing::info!(
            "Media presence: local {}, remote {}",
            presence.local,
            presence.remote
        );
        Ok(presence)
    }

    /// Place or answer the call decided by both presences
    pub async fn negotiate_call<T: Transport>(
        &self,
        session: &mut Session<T>,
        presence: Presence,
        local: Option<&LocalStream>,
    ) -> Result<MediaCallSession> {
        let role = CallRole::resolve(self.role.is_host(), presence.local, presence.remote);
        let timeout = session.config().negotiate_timeout;
        let inbox = self.inbox.clone();

        let remote_stream_id = match role {
            CallRole::NoCall => {
                tracing::info!("📵 Nobody has media, skipping the call");
                None
            }
            CallRole::Caller => {
                let stream = local.ok_or_else(|| {
                    MediaError::Denied("caller has no local stream".to_string())
                })?;
                tracing::info!("📞 Calling with stream {}", stream.id);
                session.send(&SessionMessage::MediaCall {
                    stream_id: stream.id.clone(),
                })?;

                session
                    .poll_until("waiting for the call answer", timeout, || {
                        lock(&inbox).answer.is_some()
                    })
                    .await?;

                lock(&inbox).answer.take().and_then(|(_, stream_id)| stream_id)
            }
            CallRole::Callee => {
                session
                    .poll_until("waiting for the incoming call", timeout, || {
                        lock(&inbox).offer.is_some()
                    })
                    .await?;

                let offer = lock(&inbox).offer.take();
                tracing::info!(
                    "📲 Answering call{}",
                    if local.is_some() { "" } else { " without a stream" }
                );
                session.send(&SessionMessage::MediaAnswer {
                    has_stream: local.is_some(),
                    stream_id: local.map(|stream| stream.id.clone()),
                })?;
                offer
            }
        };

        Ok(MediaCallSession {
            role,
            local_has_media: presence.local,
            remote_has_media: presence.remote,
            remote_stream_id,
        })
    }

    /// Full media sequence; a denied acquisition continues without local media.
    /// Detaches the gate's listener when done.
    pub async fn run<T: Transport, D: MediaDevices>(
        self,
        session: &mut Session<T>,
        devices: &mut D,
        constraints: MediaConstraints,
        sink: &mut EventSink,
    ) -> Result<(Option<LocalStream>, MediaCallSession)> {
        let local = match Self::acquire_local_media(devices, constraints).await {
            Ok(stream) => Some(stream),
            Err(e) => {
                tracing::warn!("Continuing without local media: {}", e);
                None
            }
        };
        sink(&GameEvent::LocalMediaSettled {
            has_media: local.is_some(),
        });

        let outcome = self.negotiate(session, local.as_ref()).await;
        session.remove_listener(self.listener);
        let call = outcome?;

        if call.role == CallRole::NoCall {
            sink(&GameEvent::CallSkipped);
        } else {
            sink(&GameEvent::CallEstablished(call.clone()));
        }

        Ok((local, call))
    }

    async fn negotiate<T: Transport>(
        &self,
        session: &mut Session<T>,
        local: Option<&LocalStream>,
    ) -> Result<MediaCallSession> {
        let presence = self.exchange_presence(session, local).await?;
        self.negotiate_call(session, presence, local).await
    }
}

fn lock(inbox: &Mutex<Inbox>) -> MutexGuard<'_, Inbox> {
    inbox.lock().unwrap_or_else(PoisonError::into_inner)
}
