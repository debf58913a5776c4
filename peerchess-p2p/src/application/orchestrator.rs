use crate::application::{
    EventSink, GameEvent, MediaDevices, MediaGate, RoomCoordinator, RoomStore, Session,
    SessionConfig, SignalingBootstrap,
};
use crate::infrastructure::error::{Result, SessionError};
use crate::infrastructure::transport::Transport;
use peerchess_core::{
    AppliedMove, ChessMove, ChessRules, LocalStream, MediaCallSession, MediaConstraints, Role,
    RoomId, SessionMessage, TurnState,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Remote moves captured from the session, in arrival order
#[derive(Clone, Default)]
struct MoveInbox {
    moves: Arc<Mutex<VecDeque<ChessMove>>>,
}

impl MoveInbox {
    fn attach<T: Transport>(session: &Session<T>) -> Self {
        let inbox = Self::default();
        let captured = inbox.clone();
        session.add_listener(false, move |message| {
            if let SessionMessage::ChessMove { mv } = message {
                captured.lock().push_back(*mv);
            }
        });
        inbox
    }

    fn pop(&self) -> Option<ChessMove> {
        self.lock().pop_front()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<ChessMove>> {
        self.moves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sequences bootstrap, room, session and media into a running [`Game`]
pub struct GameOrchestrator<S: RoomStore, D: MediaDevices> {
    config: SessionConfig,
    rooms: RoomCoordinator<S>,
    devices: D,
    constraints: MediaConstraints,
    sink: EventSink,
}

impl<S: RoomStore, D: MediaDevices> GameOrchestrator<S, D> {
    pub fn new(config: SessionConfig, store: S, devices: D) -> Self {
        let rooms = RoomCoordinator::new(store, config.room_attempts);
        Self {
            config,
            rooms,
            devices,
            constraints: MediaConstraints::default(),
            sink: Box::new(|_| {}),
        }
    }

    pub fn with_constraints(mut self, constraints: MediaConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn on_event<F>(mut self, sink: F) -> Self
    where
        F: FnMut(&GameEvent) + Send + 'static,
    {
        self.sink = Box::new(sink);
        self
    }

    /// Publish a room and wait for a guest. The host plays white.
    pub async fn host<T: Transport, R: ChessRules>(
        mut self,
        mut transport: T,
        rules: R,
    ) -> Result<Game<T, R>> {
        let identity = SignalingBootstrap::new(&self.config)
            .init(&mut transport)
            .await?;
        (self.sink)(&GameEvent::IdentityAssigned(identity.clone()));

        let room = self.rooms.create_room(&identity).await?;
        (self.sink)(&GameEvent::RoomCreated(room));

        let mut session = Session::new(transport, self.config.clone());
        let moves = MoveInbox::attach(&session);
        let gate = MediaGate::attach(&session, Role::Host);

        let connection = session.listen().await?;
        (self.sink)(&GameEvent::Connected {
            remote: connection.remote,
        });

        self.start(session, rules, Role::Host, moves, gate).await
    }

    /// Claim `room` and dial its host. The guest plays black.
    pub async fn join<T: Transport, R: ChessRules>(
        mut self,
        mut transport: T,
        room: &RoomId,
        rules: R,
    ) -> Result<Game<T, R>> {
        let identity = SignalingBootstrap::new(&self.config)
            .init(&mut transport)
            .await?;
        (self.sink)(&GameEvent::IdentityAssigned(identity));

        let host = self.rooms.join_room(room).await?;
        (self.sink)(&GameEvent::RoomJoined {
            room: room.clone(),
            host: host.clone(),
        });

        let mut session = Session::new(transport, self.config.clone());
        let moves = MoveInbox::attach(&session);
        let gate = MediaGate::attach(&session, Role::Guest);

        let connection = session.connect(&host).await?;
        (self.sink)(&GameEvent::Connected {
            remote: connection.remote,
        });

        self.start(session, rules, Role::Guest, moves, gate).await
    }

    async fn start<T: Transport, R: ChessRules>(
        mut self,
        mut session: Session<T>,
        rules: R,
        role: Role,
        moves: MoveInbox,
        gate: MediaGate,
    ) -> Result<Game<T, R>> {
        let (local_stream, call) = gate
            .run(&mut session, &mut self.devices, self.constraints, &mut self.sink)
            .await?;

        let turn = TurnState::new(role.side());
        tracing::info!("♟️ Game started as {} ({})", role.side(), role);
        (self.sink)(&GameEvent::GameStarted {
            local_side: role.side(),
        });

        Ok(Game {
            session,
            rules,
            role,
            turn,
            moves,
            call,
            local_stream,
            sink: self.sink,
            disconnect_reported: false,
        })
    }
}

/// Turn loop over an open session
pub struct Game<T: Transport, R: ChessRules> {
    session: Session<T>,
    rules: R,
    role: Role,
    turn: TurnState,
    moves: MoveInbox,
    call: MediaCallSession,
    local_stream: Option<LocalStream>,
    sink: EventSink,
    disconnect_reported: bool,
}

impl<T: Transport, R: ChessRules> Game<T, R> {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn call(&self) -> &MediaCallSession {
        &self.call
    }

    pub fn local_stream(&self) -> Option<&LocalStream> {
        self.local_stream.as_ref()
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<T> {
        &mut self.session
    }

    pub fn is_disconnected(&self) -> bool {
        self.session.state().is_closed()
    }

    /// Validate a local move, send it, then commit it. Illegal or
    /// out-of-turn moves are never transmitted; a move that fails to send
    /// leaves the board and turn untouched.
    pub fn play_local(&mut self, mv: ChessMove) -> Result<AppliedMove>
    where
        R: Clone,
    {
        if self.is_disconnected() {
            return Err(SessionError::Disconnected);
        }

        let mut next_rules = self.rules.clone();
        let (turn, applied) = match self.turn.apply_local(&mut next_rules, &mv) {
            Ok(outcome) => outcome,
            Err(e) => {
                (self.sink)(&GameEvent::MoveRejected {
                    mv,
                    reason: e.to_string(),
                    remote: false,
                });
                return Err(e.into());
            }
        };

        if let Err(e) = self.session.send(&SessionMessage::ChessMove { mv }) {
            tracing::warn!("Move {} not sent: {}", mv, e);
            return Err(e);
        }
        self.rules = next_rules;
        self.turn = turn;

        tracing::info!("♟️ Played {}", mv);
        (self.sink)(&GameEvent::MoveApplied {
            applied,
            local: true,
            turn,
        });
        Ok(applied)
    }

    /// Process inbound traffic; returns how many remote moves were applied
    pub fn poll(&mut self) -> usize {
        self.session.poll();

        let mut applied_count = 0;
        while let Some(mv) = self.moves.pop() {
            match self.turn.apply_remote(&mut self.rules, &mv) {
                Ok((turn, applied)) => {
                    self.turn = turn;
                    applied_count += 1;
                    tracing::info!("♟️ Opponent played {}", mv);
                    (self.sink)(&GameEvent::MoveApplied {
                        applied,
                        local: false,
                        turn,
                    });
                }
                Err(e) => {
                    tracing::warn!("Dropped remote move {}: {}", mv, e);
                    (self.sink)(&GameEvent::MoveRejected {
                        mv,
                        reason: e.to_string(),
                        remote: true,
                    });
                }
            }
        }

        if self.is_disconnected() && !self.disconnect_reported {
            self.disconnect_reported = true;
            tracing::info!("🔌 Opponent left the game");
            (self.sink)(&GameEvent::Disconnected);
        }

        applied_count
    }
}
