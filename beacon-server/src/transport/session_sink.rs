use crate::error::{RelayError, RelayResult};
use crate::transport::EventSink;
use async_trait::async_trait;
use beacon_core::{ServerEvent, SessionId};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Delivery map from session id to that connection's outbound channel.
/// Sends never block: the per-connection pump task is the only place
/// that awaits the actual socket.
#[derive(Clone, Default)]
pub struct SessionSink {
    peers: Arc<DashMap<SessionId, mpsc::UnboundedSender<ServerEvent>>>,
}

impl SessionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_session(&self, id: SessionId, tx: mpsc::UnboundedSender<ServerEvent>) {
        self.peers.insert(id, tx);
    }

    pub fn remove_session(&self, id: &SessionId) {
        self.peers.remove(id);
    }

    /// Number of live transports, joined or not. Used by the health
    /// endpoint.
    pub fn connected(&self) -> usize {
        self.peers.len()
    }
}

#[async_trait]
impl EventSink for SessionSink {
    async fn deliver(&self, to: SessionId, event: ServerEvent) -> RelayResult<()> {
        match self.peers.get(&to) {
            Some(peer) => peer
                .send(event)
                .map_err(|_| RelayError::TransportWrite(format!("outbound channel closed: {to}"))),
            None => Err(RelayError::TransportWrite(format!(
                "no live transport: {to}"
            ))),
        }
    }
}
