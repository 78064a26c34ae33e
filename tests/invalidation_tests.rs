use pharma_inventory::cache::{keys, CacheInvalidator};
use pharma_inventory::models::{CategoryType, CreateMedicine, Medicine, UnitOfMeasurement};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

mod common;

fn sample_medicine(tag: &str) -> Medicine {
    CreateMedicine {
        name: format!("Ibuprofen-{}", tag),
        generic_name: format!("ibuprofen-{}", tag),
        description: "Non-steroidal anti-inflammatory".to_string(),
        price: 9.99,
        batch_number: format!("B-{}", tag),
        stock_quantity: 50,
        unit_of_measurement: UnitOfMeasurement::Tablet,
        category: CategoryType::Analgesic,
        manufacturer: None,
        prescription_required: false,
        is_available: true,
        is_featured: false,
    }
    .into_medicine()
}

#[tokio::test]
async fn mutation_invalidates_detail_list_and_search_families() {
    let Some(cache) = common::test_cache().await else {
        return;
    };
    let cache = Arc::new(cache);
    let invalidator = CacheInvalidator::new(cache.clone());

    let tag = Uuid::new_v4().to_string();
    let medicine = sample_medicine(&tag);

    // Populate every key family the mutation could stale, the way the
    // read path would have
    let populated = vec![
        keys::detail_key(&medicine.id),
        keys::list_key(None),
        keys::list_key(Some(1)),
        keys::list_key(Some(2)),
        keys::search_key(&medicine.name, None),
        keys::search_key(&medicine.name, Some(1)),
        keys::search_key(&medicine.generic_name, None),
        keys::search_key(&medicine.generic_name, Some(3)),
    ];
    for key in &populated {
        cache.set(key, &json!([{"stale": true}]), keys::LIST_TTL).await;
        assert!(cache.get_value(key).await.is_some(), "setup failed for {}", key);
    }

    // A search for an unrelated term must survive the sweep
    let unrelated = keys::search_key(&format!("Amoxicillin-{}", tag), None);
    cache.set(&unrelated, &json!([{"other": true}]), keys::SEARCH_TTL).await;

    invalidator.invalidate_for_mutation(&medicine).await;

    for key in &populated {
        assert_eq!(
            cache.get_value(key).await,
            None,
            "key {} must be absent after invalidation",
            key
        );
    }
    assert!(
        cache.get_value(&unrelated).await.is_some(),
        "unrelated search keys are untouched"
    );

    // Firing again for the same mutation is a no-op, not an error
    invalidator.invalidate_for_mutation(&medicine).await;
    for key in &populated {
        assert_eq!(cache.get_value(key).await, None);
    }

    cache.delete(&unrelated).await;
}
