use serde::{Deserialize, Serialize};
use std::fmt;

/// Rooms are named broadcast scopes. Sessions that never pick one land
/// in the default room.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct RoomId(pub String);

impl RoomId {
    pub const DEFAULT: &str = "lobby";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
