use crate::error::RelayResult;
use async_trait::async_trait;
use beacon_core::{ServerEvent, SessionId};

/// Outbound side of the relay: whatever can push a [`ServerEvent`] to a
/// connected client. The routers only know this trait, which keeps them
/// testable without sockets.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, to: SessionId, event: ServerEvent) -> RelayResult<()>;
}
