use pharma_inventory::cache::{CacheManager, RedisConfig};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

mod common;

#[tokio::test]
async fn read_through_loads_once_then_serves_from_cache() {
    let Some(cache) = common::test_cache().await else {
        return;
    };
    let key = format!("test_mgr_readthrough_{}", Uuid::new_v4());
    let loads = AtomicUsize::new(0);

    let payload = json!([{"name": "Paracetamol Tablet", "batch_number": "B123"}]);

    let first = cache
        .read_through(&key, Duration::from_secs(60), || {
            loads.fetch_add(1, Ordering::SeqCst);
            let payload = payload.clone();
            async move { Ok(payload) }
        })
        .await
        .unwrap();
    assert_eq!(first, payload);
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    // Within the expiry window the loader must not run again
    let second = cache
        .read_through(&key, Duration::from_secs(60), || {
            loads.fetch_add(1, Ordering::SeqCst);
            let payload = payload.clone();
            async move { Ok(payload) }
        })
        .await
        .unwrap();
    assert_eq!(second, payload);
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    // And the populated entry matches what the loader produced
    assert_eq!(cache.get::<serde_json::Value>(&key).await, Some(payload));

    cache.delete(&key).await;
}

#[tokio::test]
async fn read_through_repopulates_after_invalidation() {
    let Some(cache) = common::test_cache().await else {
        return;
    };
    let key = format!("test_mgr_repopulate_{}", Uuid::new_v4());
    let loads = AtomicUsize::new(0);

    for _ in 0..2 {
        let _: serde_json::Value = cache
            .read_through(&key, Duration::from_secs(60), || {
                loads.fetch_add(1, Ordering::SeqCst);
                async move { Ok(json!({"generation": 1})) }
            })
            .await
            .unwrap();
        cache.delete(&key).await;
    }

    assert_eq!(loads.load(Ordering::SeqCst), 2, "a hard delete forces a reload");
}

#[tokio::test]
async fn unreachable_redis_degrades_to_miss_and_noop() {
    // Nothing listens on this port; every store call fails fast
    let cache = CacheManager::new(&RedisConfig {
        url: "redis://127.0.0.1:6399".to_string(),
        command_timeout_ms: 500,
    })
    .await
    .unwrap();

    let key = format!("test_mgr_failopen_{}", Uuid::new_v4());

    assert_eq!(cache.get::<serde_json::Value>(&key).await, None);
    cache.set(&key, &json!({"x": 1}), Duration::from_secs(60)).await;
    cache.delete(&key).await;
    cache.delete_pattern("test_mgr_failopen_*").await;

    // The loader result still comes back even though nothing can be cached
    let loads = AtomicUsize::new(0);
    for _ in 0..2 {
        let value: serde_json::Value = cache
            .read_through(&key, Duration::from_secs(60), || {
                loads.fetch_add(1, Ordering::SeqCst);
                async move { Ok(json!({"served": "from persistence"})) }
            })
            .await
            .unwrap();
        assert_eq!(value, json!({"served": "from persistence"}));
    }
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unreachable_redis_denies_locks() {
    let cache = CacheManager::new(&RedisConfig {
        url: "redis://127.0.0.1:6399".to_string(),
        command_timeout_ms: 500,
    })
    .await
    .unwrap();

    // Writers degrade to busy/retry rather than proceeding unserialized
    assert!(cache
        .acquire_lock("test_mgr_lock_down", Duration::from_secs(10))
        .await
        .is_none());
    assert!(cache.guard_mutation(&Uuid::new_v4()).await.is_none());
}

#[tokio::test]
async fn mutation_guard_serializes_writers() {
    let Some(cache) = common::test_cache().await else {
        return;
    };
    let id = Uuid::new_v4();

    let held = cache.guard_mutation(&id).await;
    assert!(held.is_some());

    // Same entity: blocked on the entity lock
    assert!(cache.guard_mutation(&id).await.is_none());
    // Different entity: blocked on the shared list lock
    assert!(cache.guard_mutation(&Uuid::new_v4()).await.is_none());

    cache.release_mutation_locks(held.unwrap()).await;

    let reacquired = cache.guard_mutation(&id).await;
    assert!(reacquired.is_some(), "release must free both locks");
    cache.release_mutation_locks(reacquired.unwrap()).await;
}
