use crate::error::{RelayError, RelayResult};
use crate::registry::Session;
use beacon_core::{RoomId, SessionId};
use std::collections::{HashMap, HashSet};

/// Single source of truth for live sessions. Owned exclusively by the
/// hub task; every mutation goes through that task's command loop, so
/// no locking is needed here.
#[derive(Debug, Default)]
pub struct Registry {
    sessions: HashMap<SessionId, Session>,
    by_name: HashMap<String, SessionId>,
    rooms: HashMap<RoomId, HashSet<SessionId>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a joined session. Id collisions cannot happen with
    /// freshly generated ids; the check is defensive.
    pub fn register(&mut self, session: Session) -> RelayResult<()> {
        if self.sessions.contains_key(&session.id) {
            return Err(RelayError::DuplicateId(session.id));
        }
        self.by_name
            .insert(session.username.clone(), session.id);
        self.rooms
            .entry(session.room.clone())
            .or_default()
            .insert(session.id);
        self.sessions.insert(session.id, session);
        Ok(())
    }

    /// Idempotent: unknown ids are a no-op. Returns the removed session
    /// so the caller can cascade room and negotiation cleanup.
    pub fn unregister(&mut self, id: SessionId) -> Option<Session> {
        let session = self.sessions.remove(&id)?;
        self.by_name.remove(&session.username);
        if let Some(members) = self.rooms.get_mut(&session.room) {
            members.remove(&id);
            if members.is_empty() {
                self.rooms.remove(&session.room);
            }
        }
        Some(session)
    }

    pub fn lookup_by_id(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn lookup_by_username(&self, name: &str) -> Option<&Session> {
        self.by_name.get(name).and_then(|id| self.sessions.get(id))
    }

    pub fn room_members(&self, room: &RoomId) -> Vec<SessionId> {
        self.rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn all_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
