use crate::error::{RelayError, RelayResult};
use beacon_core::SessionId;
use std::collections::HashMap;

/// Phase of one peer pair's negotiation. `Idle` is represented by the
/// pair being absent from the table.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NegotiationPhase {
    OfferSent,
    AnswerSent,
    Connected,
    Failed,
}

#[derive(Debug)]
struct Negotiation {
    /// The side that sent the offer.
    initiator: SessionId,
    phase: NegotiationPhase,
    candidates_from_initiator: u32,
    candidates_from_responder: u32,
}

fn pair_key(a: SessionId, b: SessionId) -> (SessionId, SessionId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Per-pair negotiation state, keyed by the canonicalized unordered
/// pair of session ids. Owned by the hub task alongside the registry.
#[derive(Debug)]
pub struct NegotiationTable {
    pairs: HashMap<(SessionId, SessionId), Negotiation>,
    min_candidate_exchanges: u32,
}

impl NegotiationTable {
    pub fn new(min_candidate_exchanges: u32) -> Self {
        Self {
            pairs: HashMap::new(),
            min_candidate_exchanges: min_candidate_exchanges.max(1),
        }
    }

    pub fn phase(&self, a: SessionId, b: SessionId) -> Option<NegotiationPhase> {
        self.pairs.get(&pair_key(a, b)).map(|n| n.phase)
    }

    /// An offer always (re)starts the pair: fresh negotiations, retries
    /// after `Failed`, and renegotiations all look the same here. It
    /// also retires the offerer's other failed pairs, which otherwise
    /// accumulate one entry per departed partner over a long session.
    pub fn offer(&mut self, from: SessionId, to: SessionId) -> NegotiationPhase {
        self.pairs
            .retain(|&(a, b), n| n.phase != NegotiationPhase::Failed || (a != from && b != from));
        self.pairs.insert(
            pair_key(from, to),
            Negotiation {
                initiator: from,
                phase: NegotiationPhase::OfferSent,
                candidates_from_initiator: 0,
                candidates_from_responder: 0,
            },
        );
        NegotiationPhase::OfferSent
    }

    /// Valid only as the responder's reply to a pending offer.
    pub fn answer(&mut self, from: SessionId, to: SessionId) -> RelayResult<NegotiationPhase> {
        let negotiation = self
            .pairs
            .get_mut(&pair_key(from, to))
            .filter(|n| n.phase == NegotiationPhase::OfferSent && n.initiator == to)
            .ok_or_else(|| {
                RelayError::OutOfOrderSignaling(format!(
                    "answer from {from} without a pending offer from {to}"
                ))
            })?;
        negotiation.phase = NegotiationPhase::AnswerSent;
        Ok(negotiation.phase)
    }

    /// Candidates may flow any time after an offer exists and before
    /// the pair failed. Once the answer is through and at least
    /// `min_candidate_exchanges` candidates have been relayed in each
    /// direction the pair counts as connected.
    pub fn candidate(&mut self, from: SessionId, to: SessionId) -> RelayResult<NegotiationPhase> {
        let negotiation = self
            .pairs
            .get_mut(&pair_key(from, to))
            .filter(|n| n.phase != NegotiationPhase::Failed)
            .ok_or_else(|| {
                RelayError::OutOfOrderSignaling(format!(
                    "candidate for pair ({from}, {to}) with no active negotiation"
                ))
            })?;

        if from == negotiation.initiator {
            negotiation.candidates_from_initiator += 1;
        } else {
            negotiation.candidates_from_responder += 1;
        }

        if negotiation.phase == NegotiationPhase::AnswerSent
            && negotiation.candidates_from_initiator >= self.min_candidate_exchanges
            && negotiation.candidates_from_responder >= self.min_candidate_exchanges
        {
            negotiation.phase = NegotiationPhase::Connected;
        }
        Ok(negotiation.phase)
    }

    /// Called when `id` disconnects. Every pair referencing it either
    /// fails (counterpart still live, must re-offer to retry) or is
    /// dropped outright (counterpart gone too). Returns the live
    /// counterparts so the caller can deliver `peer-left`.
    pub fn disconnect(
        &mut self,
        id: SessionId,
        is_live: impl Fn(&SessionId) -> bool,
    ) -> Vec<SessionId> {
        let mut notified = Vec::new();
        self.pairs.retain(|&(a, b), negotiation| {
            if a != id && b != id {
                return true;
            }
            let other = if a == id { b } else { a };
            if is_live(&other) {
                negotiation.phase = NegotiationPhase::Failed;
                notified.push(other);
                true
            } else {
                false
            }
        });
        notified
    }
}
