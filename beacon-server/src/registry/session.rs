use beacon_core::{RoomId, SessionId};

/// Server-side record of one joined client. The outbound transport
/// handle lives in the delivery map, not here; a `Session` exists only
/// between a successful join and cleanup.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub username: String,
    pub room: RoomId,
}

impl Session {
    pub fn new(id: SessionId, username: impl Into<String>, room: RoomId) -> Self {
        Self {
            id,
            username: username.into(),
            room,
        }
    }
}
