use beacon_core::{ServerEvent, SessionId};
use thiserror::Error;

/// Everything that can go wrong while relaying. Each variant maps to a
/// stable `kind` string carried by the `error` event sent back to the
/// offending client.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid username: {0}")]
    InvalidName(String),

    #[error("session id already registered: {0}")]
    DuplicateId(SessionId),

    #[error("unknown recipient: {0}")]
    UnknownRecipient(String),

    #[error("out-of-order signaling: {0}")]
    OutOfOrderSignaling(String),

    #[error("transport write failed: {0}")]
    TransportWrite(String),

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}

impl RelayError {
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::InvalidName(_) => "invalid-name",
            RelayError::DuplicateId(_) => "duplicate-id",
            RelayError::UnknownRecipient(_) => "unknown-recipient",
            RelayError::OutOfOrderSignaling(_) => "out-of-order-signaling",
            RelayError::TransportWrite(_) => "transport-write",
            RelayError::ProtocolViolation(_) => "protocol-violation",
        }
    }

    /// The `error{kind,detail}` event reported back to the client that
    /// caused this error.
    pub fn to_event(&self) -> ServerEvent {
        ServerEvent::Error {
            kind: self.kind().to_string(),
            detail: self.to_string(),
        }
    }
}

pub type RelayResult<T> = Result<T, RelayError>;
