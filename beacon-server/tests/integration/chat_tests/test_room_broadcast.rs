use beacon_core::{ChatScope, ServerEvent};

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::{join_in_room, send_chat, sync_hub};

#[tokio::test]
async fn test_plain_chat_reaches_the_room_but_not_the_sender() {
    init_tracing();

    let (hub_tx, sink) = create_test_hub();

    let (alice_id, _) = join_in_room(&hub_tx, "alice", Some("red")).await;
    let (bob_id, _) = join_in_room(&hub_tx, "bob", Some("red")).await;
    let (carol_id, _) = join_in_room(&hub_tx, "carol", Some("red")).await;
    let (dave_id, _) = join_in_room(&hub_tx, "dave", Some("blue")).await;

    send_chat(&hub_tx, alice_id, "morning everyone").await;

    for id in [bob_id, carol_id] {
        let delivered = sink
            .wait_for_event(
                move |to, event| *to == id && matches!(event, ServerEvent::ChatMessage { .. }),
                2000,
            )
            .await
            .expect("room members should receive the message");
        assert_eq!(
            delivered,
            ServerEvent::ChatMessage {
                from: "alice".into(),
                scope: ChatScope::Room,
                body: "morning everyone".into()
            }
        );
    }

    sync_hub(&hub_tx).await;
    assert!(
        sink.chat_messages_for(dave_id).await.is_empty(),
        "room chat must not cross room boundaries"
    );
    assert!(
        sink.chat_messages_for(alice_id).await.is_empty(),
        "the sender's client already rendered the message locally"
    );
}

#[tokio::test]
async fn test_sole_occupant_chat_is_silently_absorbed() {
    init_tracing();

    let (hub_tx, sink) = create_test_hub();

    let (alice_id, _) = join_in_room(&hub_tx, "alice", Some("solo")).await;

    send_chat(&hub_tx, alice_id, "anyone here?").await;
    sync_hub(&hub_tx).await;

    // No recipients and no failures: no receipt, no error.
    let alice_events = sink.events_for(alice_id).await;
    assert!(
        !alice_events.iter().any(|event| matches!(
            event,
            ServerEvent::ChatReceipt { .. } | ServerEvent::Error { .. }
        )),
        "an empty room is not an error"
    );
}
