mod chat;
mod event;
mod frame;
mod room;
mod session;
mod signaling;

pub use chat::ChatScope;
pub use event::{PeerSummary, ServerEvent};
pub use frame::ClientFrame;
pub use room::RoomId;
pub use session::SessionId;
pub use signaling::{SignalKind, SignalingMessage};
