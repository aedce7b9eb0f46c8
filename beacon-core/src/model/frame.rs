use crate::model::chat::ChatScope;
use crate::model::session::SessionId;
use serde::{Deserialize, Serialize};

/// Everything a client may send over its WebSocket, as a tagged JSON
/// envelope: `{"op": "...", "d": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ClientFrame {
    Join {
        username: String,
        #[serde(default)]
        room: Option<String>,
    },
    Leave,
    Offer {
        to: SessionId,
        sdp: String,
    },
    Answer {
        to: SessionId,
        sdp: String,
    },
    IceCandidate {
        to: SessionId,
        candidate: String,
    },
    Chat {
        #[serde(default)]
        scope: Option<ChatScope>,
        #[serde(default)]
        target: Option<String>,
        body: String,
    },
}
