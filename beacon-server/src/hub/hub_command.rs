use crate::error::RelayResult;
use beacon_core::{ChatScope, SessionId, SignalingMessage};
use tokio::sync::oneshot;

/// Commands from the per-connection tasks into the hub actor.
#[derive(Debug)]
pub enum HubCommand {
    /// A connection wants to become a session. The reply carries the
    /// granted username or the rejection.
    Join {
        session_id: SessionId,
        username: String,
        room: Option<String>,
        reply: oneshot::Sender<RelayResult<String>>,
    },

    /// One hop of offer/answer/candidate traffic.
    Signal(SignalingMessage),

    Chat {
        from: SessionId,
        scope: Option<ChatScope>,
        target: Option<String>,
        body: String,
    },

    /// The connection is gone: explicit leave, socket close or error.
    /// Safe to send more than once.
    Disconnect { session_id: SessionId },
}
