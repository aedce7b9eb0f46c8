use crate::model::session::SessionId;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalKind::Offer => "offer",
            SignalKind::Answer => "answer",
            SignalKind::IceCandidate => "ice-candidate",
        };
        write!(f, "{s}")
    }
}

/// One hop of WebRTC negotiation traffic. The payload is an opaque SDP
/// or ICE blob; the relay forwards it verbatim and never parses it.
#[derive(Debug, Clone)]
pub struct SignalingMessage {
    pub kind: SignalKind,
    pub from: SessionId,
    pub to: SessionId,
    pub payload: String,
}
