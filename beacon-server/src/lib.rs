pub mod chat;
pub mod config;
pub mod error;
pub mod health;
pub mod hub;
pub mod registry;
pub mod signaling;
pub mod transport;

pub use chat::{ChatRouter, DeliveryResult};
pub use config::RelayConfig;
pub use error::{RelayError, RelayResult};
pub use health::health_handler;
pub use hub::{Hub, HubCommand};
pub use registry::{Registry, Session, claim};
pub use signaling::{NegotiationPhase, NegotiationTable, SignalingRouter};
pub use transport::{EventSink, SessionSink, ws_handler};

use std::time::Instant;
use tokio::sync::mpsc;

/// Shared state behind the axum router.
pub struct AppState {
    pub sink: SessionSink,
    pub hub_tx: mpsc::Sender<HubCommand>,
    pub config: RelayConfig,
    pub started_at: Instant,
}
