use beacon_core::ServerEvent;

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::{disconnect, join_as, sync_hub};

#[tokio::test]
async fn test_duplicate_usernames_get_deterministic_suffixes() {
    init_tracing();

    let (hub_tx, _sink) = create_test_hub();

    let (_, first) = join_as(&hub_tx, "sam").await;
    let (_, second) = join_as(&hub_tx, "sam").await;
    let (_, third) = join_as(&hub_tx, "sam").await;

    assert_eq!(first, "sam");
    assert_eq!(second, "sam-2");
    assert_eq!(third, "sam-3");
}

#[tokio::test]
async fn test_concurrent_claims_for_same_name_stay_unique() {
    init_tracing();

    let (hub_tx, _sink) = create_test_hub();

    let task_a = tokio::spawn({
        let hub_tx = hub_tx.clone();
        async move { join_as(&hub_tx, "sam").await.1 }
    });
    let task_b = tokio::spawn({
        let hub_tx = hub_tx.clone();
        async move { join_as(&hub_tx, "sam").await.1 }
    });

    let name_a = task_a.await.unwrap();
    let name_b = task_b.await.unwrap();

    assert_ne!(name_a, name_b);
    let mut names = vec![name_a, name_b];
    names.sort();
    assert_eq!(names, vec!["sam", "sam-2"]);
}

#[tokio::test]
async fn test_name_taken_retry_event_announces_the_suffix() {
    init_tracing();

    let (hub_tx, sink) = create_test_hub();

    let (_, _) = join_as(&hub_tx, "kim").await;
    let (second_id, granted) = join_as(&hub_tx, "kim").await;
    assert_eq!(granted, "kim-2");

    let events = sink.events_for(second_id).await;
    assert!(matches!(
        &events[0],
        ServerEvent::NameTakenRetry { suggested_name } if suggested_name == "kim-2"
    ));
    assert!(matches!(
        &events[1],
        ServerEvent::Joined { username, .. } if username == "kim-2"
    ));
}

#[tokio::test]
async fn test_freed_name_can_be_claimed_again() {
    init_tracing();

    let (hub_tx, _sink) = create_test_hub();

    let (first_id, granted) = join_as(&hub_tx, "sam").await;
    assert_eq!(granted, "sam");

    disconnect(&hub_tx, first_id).await;
    sync_hub(&hub_tx).await;

    let (_, granted) = join_as(&hub_tx, "sam").await;
    assert_eq!(granted, "sam");
}
