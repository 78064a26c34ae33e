use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

mod common;

#[tokio::test]
async fn set_then_get_is_value_equal() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let key = format!("test_store_roundtrip_{}", Uuid::new_v4());

    let value = json!({"name": "Paracetamol Tablet", "batch_number": "B123", "price": 4.99});
    store.set(&key, &value, Duration::from_secs(60)).await.unwrap();

    let fetched = store.get(&key).await.unwrap();
    assert_eq!(fetched, Some(value));

    store.delete(&key).await.unwrap();
}

#[tokio::test]
async fn arrays_round_trip_decoded() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let key = format!("test_store_array_{}", Uuid::new_v4());

    let value = json!([{"name": "Amoxicillin"}, {"name": "Ibuprofen"}]);
    store.set(&key, &value, Duration::from_secs(60)).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), Some(value));

    store.delete(&key).await.unwrap();
}

#[tokio::test]
async fn legacy_plain_string_payloads_are_tolerated() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let key = format!("test_store_legacy_{}", Uuid::new_v4());

    // A scalar is stored stringified, not JSON-encoded
    store
        .set(&key, &json!("plain text payload"), Duration::from_secs(60))
        .await
        .unwrap();
    assert_eq!(store.get_raw(&key).await.unwrap().as_deref(), Some("plain text payload"));

    // Reads hand it back as a string value instead of failing to parse
    assert_eq!(
        store.get(&key).await.unwrap(),
        Some(json!("plain text payload"))
    );

    store.delete(&key).await.unwrap();
}

#[tokio::test]
async fn absent_key_is_none_not_error() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let key = format!("test_store_absent_{}", Uuid::new_v4());
    assert_eq!(store.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let key = format!("test_store_del_{}", Uuid::new_v4());

    store.set(&key, &json!({"x": 1}), Duration::from_secs(60)).await.unwrap();
    store.delete(&key).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), None);

    // Second delete of an absent key must not error
    store.delete(&key).await.unwrap();
    assert_eq!(store.get(&key).await.unwrap(), None);
}

#[tokio::test]
async fn pattern_sweep_removes_only_matching_keys() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let prefix = format!("test_store_sweep_{}", Uuid::new_v4());

    for n in 1..=3 {
        let key = format!("{}_page_{}", prefix, n);
        store.set(&key, &json!({"page": n}), Duration::from_secs(60)).await.unwrap();
    }
    let unrelated = format!("{}_base", prefix);
    store.set(&unrelated, &json!({"base": true}), Duration::from_secs(60)).await.unwrap();

    let removed = store
        .delete_pattern(&format!("{}_page_*", prefix))
        .await
        .unwrap();
    assert_eq!(removed, 3);

    for n in 1..=3 {
        let key = format!("{}_page_{}", prefix, n);
        assert_eq!(store.get(&key).await.unwrap(), None);
    }
    assert!(store.get(&unrelated).await.unwrap().is_some());

    store.delete(&unrelated).await.unwrap();
}

#[tokio::test]
async fn entries_expire_after_their_ttl() {
    let Some(store) = common::test_store().await else {
        return;
    };
    let key = format!("test_store_expiry_{}", Uuid::new_v4());

    store.set(&key, &json!({"fleeting": true}), Duration::from_secs(1)).await.unwrap();
    assert!(store.get(&key).await.unwrap().is_some());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(store.get(&key).await.unwrap(), None);
}
