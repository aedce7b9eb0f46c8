use crate::AppState;
use crate::error::RelayError;
use crate::hub::HubCommand;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use beacon_core::{ClientFrame, ServerEvent, SessionId, SignalKind, SignalingMessage};
use futures::stream::SplitStream;
use futures::{SinkExt, Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = SessionId::new();
    info!(%session_id, "new connection");

    let (mut sender, receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    state.sink.add_session(session_id, tx.clone());

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!("failed to serialize event: {e}"),
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let state = state.clone();
        async move { run_session(session_id, receiver, state, tx).await }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Exactly one cleanup path, whichever side ended first. The hub's
    // unregister is idempotent so a racing explicit leave is harmless.
    let _ = state
        .hub_tx
        .send(HubCommand::Disconnect { session_id })
        .await;
    state.sink.remove_session(&session_id);
    info!(%session_id, "connection closed");
}

/// Drives one connection through its phases: joining (a valid join
/// frame must arrive within the configured timeout), then active frame
/// dispatch until the client leaves or the socket dies.
async fn run_session(
    session_id: SessionId,
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    tx: mpsc::UnboundedSender<ServerEvent>,
) {
    if !join_phase(session_id, &mut receiver, &state, &tx).await {
        return;
    }

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientFrame>(&text) {
                Ok(ClientFrame::Leave) => break,
                Ok(frame) => {
                    if !dispatch(session_id, frame, &state, &tx).await {
                        break;
                    }
                }
                Err(e) => {
                    warn!(%session_id, "malformed frame dropped: {e}");
                    let err = RelayError::ProtocolViolation(format!("malformed frame: {e}"));
                    let _ = tx.send(err.to_event());
                }
            },
            Message::Close(_) => break,
            // Pings and pongs are handled by axum; binary is not part
            // of the protocol.
            _ => {}
        }
    }
}

/// Returns true once the session is admitted. Invalid names get an
/// error event and a fresh deadline for the next attempt; control
/// frames and malformed text do not buy more time.
async fn join_phase<S>(
    session_id: SessionId,
    receiver: &mut S,
    state: &Arc<AppState>,
    tx: &mpsc::UnboundedSender<ServerEvent>,
) -> bool
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let mut deadline = tokio::time::Instant::now() + state.config.join_timeout;
    loop {
        let msg = match tokio::time::timeout_at(deadline, receiver.next()).await {
            Err(_) => {
                warn!(%session_id, "no join frame within timeout, closing");
                return false;
            }
            Ok(None) => return false,
            Ok(Some(Err(_))) => return false,
            Ok(Some(Ok(msg))) => msg,
        };

        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => return false,
            _ => continue,
        };

        match serde_json::from_str::<ClientFrame>(&text) {
            Ok(ClientFrame::Join { username, room }) => {
                let (reply_tx, reply_rx) = oneshot::channel();
                let cmd = HubCommand::Join {
                    session_id,
                    username,
                    room,
                    reply: reply_tx,
                };
                if state.hub_tx.send(cmd).await.is_err() {
                    error!("hub is gone");
                    return false;
                }
                match reply_rx.await {
                    Ok(Ok(_granted)) => return true,
                    Ok(Err(e)) => {
                        // Rejected (e.g. blank name); client may retry.
                        let _ = tx.send(e.to_event());
                        deadline = tokio::time::Instant::now() + state.config.join_timeout;
                    }
                    Err(_) => return false,
                }
            }
            Ok(ClientFrame::Leave) => return false,
            Ok(_) => {
                let err = RelayError::ProtocolViolation("expected a join frame first".into());
                warn!(%session_id, "{err}");
                let _ = tx.send(err.to_event());
            }
            Err(e) => {
                warn!(%session_id, "malformed frame dropped: {e}");
                let err = RelayError::ProtocolViolation(format!("malformed frame: {e}"));
                let _ = tx.send(err.to_event());
            }
        }
    }
}

/// Forwards one active-phase frame to the hub. Returns false when the
/// session should end.
async fn dispatch(
    session_id: SessionId,
    frame: ClientFrame,
    state: &Arc<AppState>,
    tx: &mpsc::UnboundedSender<ServerEvent>,
) -> bool {
    let cmd = match frame {
        ClientFrame::Offer { to, sdp } => HubCommand::Signal(SignalingMessage {
            kind: SignalKind::Offer,
            from: session_id,
            to,
            payload: sdp,
        }),
        ClientFrame::Answer { to, sdp } => HubCommand::Signal(SignalingMessage {
            kind: SignalKind::Answer,
            from: session_id,
            to,
            payload: sdp,
        }),
        ClientFrame::IceCandidate { to, candidate } => HubCommand::Signal(SignalingMessage {
            kind: SignalKind::IceCandidate,
            from: session_id,
            to,
            payload: candidate,
        }),
        ClientFrame::Chat {
            scope,
            target,
            body,
        } => HubCommand::Chat {
            from: session_id,
            scope,
            target,
            body,
        },
        ClientFrame::Join { .. } => {
            let err = RelayError::ProtocolViolation("already joined".into());
            let _ = tx.send(err.to_event());
            return true;
        }
        // Leave is handled by the caller.
        ClientFrame::Leave => return false,
    };

    if state.hub_tx.send(cmd).await.is_err() {
        error!("hub is gone");
        return false;
    }
    true
}
