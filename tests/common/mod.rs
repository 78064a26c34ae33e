use pharma_inventory::cache::{CacheManager, RedisConfig, RedisStore};

pub fn redis_config() -> RedisConfig {
    RedisConfig {
        url: std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        command_timeout_ms: 2000,
    }
}

/// Connect to the test Redis, or None when it is not running (the tests
/// are skipped in that case)
#[allow(dead_code)]
pub async fn test_cache() -> Option<CacheManager> {
    let cache = CacheManager::new(&redis_config()).await.ok()?;
    match cache.ping().await {
        Ok(()) => Some(cache),
        Err(_) => {
            println!("Redis not available for testing");
            None
        }
    }
}

#[allow(dead_code)]
pub async fn test_store() -> Option<RedisStore> {
    let store = RedisStore::connect(&redis_config()).await.ok()?;
    match store.ping().await {
        Ok(()) => Some(store),
        Err(_) => {
            println!("Redis not available for testing");
            None
        }
    }
}
