mod negotiation;
mod signaling_router;

pub use negotiation::{NegotiationPhase, NegotiationTable};
pub use signaling_router::SignalingRouter;
