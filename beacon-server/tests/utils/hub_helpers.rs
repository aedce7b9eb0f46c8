use beacon_core::{ChatScope, SessionId, SignalKind, SignalingMessage};
use beacon_server::{HubCommand, RelayResult};
use tokio::sync::{mpsc, oneshot};

/// Join with a fresh session id; panics if the hub rejects the name.
pub async fn join_as(hub_tx: &mpsc::Sender<HubCommand>, username: &str) -> (SessionId, String) {
    join_in_room(hub_tx, username, None).await
}

pub async fn join_in_room(
    hub_tx: &mpsc::Sender<HubCommand>,
    username: &str,
    room: Option<&str>,
) -> (SessionId, String) {
    let session_id = SessionId::new();
    let granted = try_join(hub_tx, session_id, username, room)
        .await
        .expect("join should be granted");
    (session_id, granted)
}

pub async fn try_join(
    hub_tx: &mpsc::Sender<HubCommand>,
    session_id: SessionId,
    username: &str,
    room: Option<&str>,
) -> RelayResult<String> {
    let (reply, reply_rx) = oneshot::channel();
    hub_tx
        .send(HubCommand::Join {
            session_id,
            username: username.to_string(),
            room: room.map(String::from),
            reply,
        })
        .await
        .expect("hub should be running");
    reply_rx.await.expect("hub should reply")
}

pub async fn disconnect(hub_tx: &mpsc::Sender<HubCommand>, session_id: SessionId) {
    hub_tx
        .send(HubCommand::Disconnect { session_id })
        .await
        .expect("hub should be running");
}

/// Plain chat frame, no explicit scope; commands go in the body.
pub async fn send_chat(hub_tx: &mpsc::Sender<HubCommand>, from: SessionId, body: &str) {
    hub_tx
        .send(HubCommand::Chat {
            from,
            scope: None,
            target: None,
            body: body.to_string(),
        })
        .await
        .expect("hub should be running");
}

/// Chat frame with an explicit scope and optional target, for clients
/// that set the scope field instead of using body commands.
pub async fn send_chat_scoped(
    hub_tx: &mpsc::Sender<HubCommand>,
    from: SessionId,
    scope: Option<ChatScope>,
    target: Option<&str>,
    body: &str,
) {
    hub_tx
        .send(HubCommand::Chat {
            from,
            scope,
            target: target.map(String::from),
            body: body.to_string(),
        })
        .await
        .expect("hub should be running");
}

pub async fn send_signal(
    hub_tx: &mpsc::Sender<HubCommand>,
    kind: SignalKind,
    from: SessionId,
    to: SessionId,
    payload: &str,
) {
    hub_tx
        .send(HubCommand::Signal(SignalingMessage {
            kind,
            from,
            to,
            payload: payload.to_string(),
        }))
        .await
        .expect("hub should be running");
}

/// Waits until every previously sent command has been processed. Joins
/// reply through a oneshot and the hub handles commands in order, so a
/// throwaway join in a private room acts as a barrier. The probe only
/// ever receives its own events.
pub async fn sync_hub(hub_tx: &mpsc::Sender<HubCommand>) {
    let probe = SessionId::new();
    let name = format!("sync-probe-{probe}");
    let _ = try_join(hub_tx, probe, &name, Some("sync-probe-room")).await;
    disconnect(hub_tx, probe).await;
}
