use crate::registry::Registry;
use crate::signaling::{NegotiationPhase, NegotiationTable};
use crate::transport::EventSink;
use beacon_core::{ServerEvent, SessionId, SignalKind, SignalingMessage};
use tracing::{debug, warn};

/// Relays negotiation traffic between exactly the two named peers and
/// tracks each pair's phase. Payloads pass through verbatim.
pub struct SignalingRouter {
    table: NegotiationTable,
}

impl SignalingRouter {
    pub fn new(min_candidate_exchanges: u32) -> Self {
        Self {
            table: NegotiationTable::new(min_candidate_exchanges),
        }
    }

    pub async fn relay(&mut self, registry: &Registry, sink: &dyn EventSink, msg: SignalingMessage) {
        if registry.lookup_by_id(msg.to).is_none() {
            debug!(from = %msg.from, to = %msg.to, "signal for unknown peer");
            let _ = sink
                .deliver(msg.from, ServerEvent::PeerUnavailable { peer_id: msg.to })
                .await;
            return;
        }

        let phase = match msg.kind {
            SignalKind::Offer => self.table.offer(msg.from, msg.to),
            SignalKind::Answer => match self.table.answer(msg.from, msg.to) {
                Ok(phase) => phase,
                Err(e) => {
                    warn!(from = %msg.from, to = %msg.to, "{e}");
                    let _ = sink.deliver(msg.from, e.to_event()).await;
                    return;
                }
            },
            SignalKind::IceCandidate => match self.table.candidate(msg.from, msg.to) {
                Ok(phase) => phase,
                Err(e) => {
                    warn!(from = %msg.from, to = %msg.to, "{e}");
                    let _ = sink.deliver(msg.from, e.to_event()).await;
                    return;
                }
            },
        };

        if phase == NegotiationPhase::Connected {
            debug!(a = %msg.from, b = %msg.to, "negotiation connected");
        }

        let event = match msg.kind {
            SignalKind::Offer => ServerEvent::Offer {
                from: msg.from,
                sdp: msg.payload,
            },
            SignalKind::Answer => ServerEvent::Answer {
                from: msg.from,
                sdp: msg.payload,
            },
            SignalKind::IceCandidate => ServerEvent::IceCandidate {
                from: msg.from,
                candidate: msg.payload,
            },
        };

        // A write failure here means the recipient's transport died
        // under us; its own disconnect path handles the cleanup.
        if let Err(e) = sink.deliver(msg.to, event).await {
            warn!(to = %msg.to, "dropping signal: {e}");
        }
    }

    /// Cancels every negotiation referencing a departed session and
    /// tells the surviving counterparts. Returns who was notified so
    /// the caller can avoid duplicate `peer-left` events.
    pub async fn cancel_for(
        &mut self,
        registry: &Registry,
        sink: &dyn EventSink,
        id: SessionId,
    ) -> Vec<SessionId> {
        let counterparts = self
            .table
            .disconnect(id, |other| registry.lookup_by_id(*other).is_some());
        for &other in &counterparts {
            let _ = sink
                .deliver(other, ServerEvent::PeerLeft { peer_id: id })
                .await;
        }
        counterparts
    }
}
