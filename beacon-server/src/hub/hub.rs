use crate::chat::ChatRouter;
use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};
use crate::hub::HubCommand;
use crate::registry::{Registry, Session, claim};
use crate::signaling::SignalingRouter;
use crate::transport::EventSink;
use beacon_core::{PeerSummary, RoomId, ServerEvent, SessionId, SignalingMessage};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The hub owns every piece of mutable relay state — registry, rooms,
/// negotiation table — and is the only task that touches it. All
/// connection tasks talk to it through the command channel, which
/// serializes joins, leaves and routing.
pub struct Hub {
    registry: Registry,
    signaling: SignalingRouter,
    chat: ChatRouter,
    sink: Arc<dyn EventSink>,
    command_rx: mpsc::Receiver<HubCommand>,
    default_room: RoomId,
}

impl Hub {
    pub fn new(
        sink: Arc<dyn EventSink>,
        command_rx: mpsc::Receiver<HubCommand>,
        config: &RelayConfig,
    ) -> Self {
        Self {
            registry: Registry::new(),
            signaling: SignalingRouter::new(config.min_candidate_exchanges),
            chat: ChatRouter::new(),
            sink,
            command_rx,
            default_room: RoomId::new(config.default_room.clone()),
        }
    }

    pub async fn run(mut self) {
        info!("hub event loop started");
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }
        info!("hub event loop finished");
    }

    async fn handle_command(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Join {
                session_id,
                username,
                room,
                reply,
            } => {
                let outcome = self.handle_join(session_id, &username, room).await;
                let _ = reply.send(outcome);
            }
            HubCommand::Signal(msg) => self.handle_signal(msg).await,
            HubCommand::Chat {
                from,
                scope,
                target,
                body,
            } => {
                let result = self
                    .chat
                    .route(&self.registry, self.sink.as_ref(), from, scope, target, body)
                    .await;
                debug!(%from, ?result, "chat routed");
            }
            HubCommand::Disconnect { session_id } => self.handle_disconnect(session_id).await,
        }
    }

    async fn handle_join(
        &mut self,
        session_id: SessionId,
        requested: &str,
        room: Option<String>,
    ) -> RelayResult<String> {
        let username = claim(requested, |name| {
            self.registry.lookup_by_username(name).is_some()
        })?;

        let room = room
            .map(|r| RoomId::new(r))
            .filter(|r| !r.0.trim().is_empty())
            .unwrap_or_else(|| self.default_room.clone());

        // Roster snapshot before admission, so it excludes the joiner.
        let peers: Vec<PeerSummary> = self
            .registry
            .room_members(&room)
            .into_iter()
            .filter_map(|id| self.registry.lookup_by_id(id))
            .map(|s| PeerSummary {
                peer_id: s.id,
                username: s.username.clone(),
            })
            .collect();

        self.registry
            .register(Session::new(session_id, username.clone(), room.clone()))?;
        info!(%session_id, username, room = %room, "session joined");

        if username != requested.trim() {
            let _ = self
                .sink
                .deliver(
                    session_id,
                    ServerEvent::NameTakenRetry {
                        suggested_name: username.clone(),
                    },
                )
                .await;
        }
        let _ = self
            .sink
            .deliver(
                session_id,
                ServerEvent::Joined {
                    peer_id: session_id,
                    username: username.clone(),
                    room: room.0.clone(),
                    peers: peers.clone(),
                },
            )
            .await;

        for peer in &peers {
            let _ = self
                .sink
                .deliver(
                    peer.peer_id,
                    ServerEvent::PeerJoined {
                        peer_id: session_id,
                        username: username.clone(),
                    },
                )
                .await;
        }

        Ok(username)
    }

    async fn handle_signal(&mut self, msg: SignalingMessage) {
        if msg.from == msg.to {
            let err = RelayError::ProtocolViolation("cannot signal yourself".into());
            let _ = self.sink.deliver(msg.from, err.to_event()).await;
            return;
        }
        self.signaling
            .relay(&self.registry, self.sink.as_ref(), msg)
            .await;
    }

    async fn handle_disconnect(&mut self, session_id: SessionId) {
        let Some(session) = self.registry.unregister(session_id) else {
            // Second termination signal racing the first; already done.
            return;
        };
        info!(%session_id, username = session.username, "session closed");

        let notified: HashSet<SessionId> = self
            .signaling
            .cancel_for(&self.registry, self.sink.as_ref(), session_id)
            .await
            .into_iter()
            .collect();

        for member in self.registry.room_members(&session.room) {
            if notified.contains(&member) {
                continue;
            }
            let _ = self
                .sink
                .deliver(
                    member,
                    ServerEvent::PeerLeft {
                        peer_id: session_id,
                    },
                )
                .await;
        }
    }
}
