use crate::model::chat::ChatScope;
use crate::model::session::SessionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeerSummary {
    pub peer_id: SessionId,
    pub username: String,
}

/// Everything the server may push to a client, same envelope as
/// [`crate::ClientFrame`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ServerEvent {
    Joined {
        peer_id: SessionId,
        username: String,
        room: String,
        peers: Vec<PeerSummary>,
    },
    NameTakenRetry {
        suggested_name: String,
    },
    PeerJoined {
        peer_id: SessionId,
        username: String,
    },
    PeerLeft {
        peer_id: SessionId,
    },
    PeerUnavailable {
        peer_id: SessionId,
    },
    Offer {
        from: SessionId,
        sdp: String,
    },
    Answer {
        from: SessionId,
        sdp: String,
    },
    IceCandidate {
        from: SessionId,
        candidate: String,
    },
    ChatMessage {
        from: String,
        scope: ChatScope,
        body: String,
    },
    ChatReceipt {
        scope: ChatScope,
        delivered: usize,
        failed: Vec<String>,
    },
    Error {
        kind: String,
        detail: String,
    },
}
