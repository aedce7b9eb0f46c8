use axum::{Router, routing::get};
use beacon_server::{AppState, Hub, RelayConfig, SessionSink, health_handler, ws_handler};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RelayConfig::from_env();
    info!(?config, "starting relay");

    let sink = SessionSink::new();
    let (hub_tx, hub_rx) = mpsc::channel(256);
    let hub = Hub::new(Arc::new(sink.clone()), hub_rx, &config);
    tokio::spawn(hub.run());

    let state = Arc::new(AppState {
        sink,
        hub_tx,
        config: config.clone(),
        started_at: Instant::now(),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("signaling relay listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
