use beacon_core::ServerEvent;
use beacon_server::RelayConfig;

use crate::integration::{create_test_hub, create_test_hub_with, init_tracing};
use crate::utils::{disconnect, join_as, join_in_room};

#[tokio::test]
async fn test_joined_event_carries_the_room_roster() {
    init_tracing();

    let (hub_tx, sink) = create_test_hub();

    let (alice_id, _) = join_as(&hub_tx, "alice").await;
    let (bob_id, _) = join_as(&hub_tx, "bob").await;

    let alice_joined = sink
        .wait_for_event(
            |to, event| *to == alice_id && matches!(event, ServerEvent::Joined { .. }),
            2000,
        )
        .await
        .expect("alice should get a joined event");
    match alice_joined {
        ServerEvent::Joined { peers, room, .. } => {
            assert_eq!(room, "lobby");
            assert!(peers.is_empty(), "first joiner sees an empty roster");
        }
        other => panic!("unexpected event {other:?}"),
    }

    let bob_joined = sink
        .wait_for_event(
            |to, event| *to == bob_id && matches!(event, ServerEvent::Joined { .. }),
            2000,
        )
        .await
        .expect("bob should get a joined event");
    match bob_joined {
        ServerEvent::Joined { peers, .. } => {
            assert_eq!(peers.len(), 1);
            assert_eq!(peers[0].peer_id, alice_id);
            assert_eq!(peers[0].username, "alice");
        }
        other => panic!("unexpected event {other:?}"),
    }

    // Existing members hear about the newcomer.
    let peer_joined = sink
        .wait_for_event(
            |to, event| {
                *to == alice_id
                    && matches!(event, ServerEvent::PeerJoined { peer_id, .. } if *peer_id == bob_id)
            },
            2000,
        )
        .await;
    assert!(peer_joined.is_some());
}

#[tokio::test]
async fn test_rooms_do_not_leak_roster_events() {
    init_tracing();

    let (hub_tx, sink) = create_test_hub();

    let (alice_id, _) = join_in_room(&hub_tx, "alice", Some("red")).await;
    let (bob_id, _) = join_in_room(&hub_tx, "bob", Some("blue")).await;

    sink.wait_for_event(
        |to, event| *to == bob_id && matches!(event, ServerEvent::Joined { .. }),
        2000,
    )
    .await
    .expect("bob should join");

    let alice_events = sink.events_for(alice_id).await;
    assert!(
        !alice_events
            .iter()
            .any(|event| matches!(event, ServerEvent::PeerJoined { .. })),
        "a join in another room must not be announced"
    );

    disconnect(&hub_tx, bob_id).await;

    // Bob's leave likewise stays inside his own (now empty) room.
    let (carol_id, _) = join_in_room(&hub_tx, "carol", Some("red")).await;
    sink.wait_for_event(
        |to, event| *to == carol_id && matches!(event, ServerEvent::Joined { .. }),
        2000,
    )
    .await
    .expect("carol should join");

    let alice_events = sink.events_for(alice_id).await;
    assert!(
        !alice_events
            .iter()
            .any(|event| matches!(event, ServerEvent::PeerLeft { .. })),
        "a leave in another room must not be announced"
    );
}

#[tokio::test]
async fn test_bare_joins_land_in_the_configured_default_room() {
    init_tracing();

    let config = RelayConfig {
        default_room: "plaza".into(),
        ..RelayConfig::default()
    };
    let (hub_tx, sink) = create_test_hub_with(config);

    let (alice_id, _) = join_as(&hub_tx, "alice").await;

    let joined = sink
        .wait_for_event(
            |to, event| *to == alice_id && matches!(event, ServerEvent::Joined { .. }),
            2000,
        )
        .await
        .expect("alice should join");
    match joined {
        ServerEvent::Joined { room, .. } => assert_eq!(room, "plaza"),
        other => panic!("unexpected event {other:?}"),
    }
}
