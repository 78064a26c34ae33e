use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::{keys, CacheResult, LockManager, LockToken, RedisConfig, RedisStore};
use crate::error::Result;

/// Locks held around one medicine mutation: the list/global lock plus the
/// per-entity lock.
pub struct MutationLocks {
    list: LockToken,
    detail: LockToken,
}

/// Facade over the Redis store and lock manager.
///
/// This is the component handlers and repositories talk to. Reads are
/// read-through; writes are invalidated under locks. Store failures are
/// mapped here, and only here, to fail-open behavior: a read error degrades
/// to a miss, a write or delete error degrades to a no-op.
pub struct CacheManager {
    store: RedisStore,
    locks: LockManager,
}

impl CacheManager {
    /// Construct from configuration. The connection pool is created
    /// eagerly; an unreachable Redis is reported but not fatal.
    pub async fn new(config: &RedisConfig) -> CacheResult<Self> {
        let store = RedisStore::connect(config).await?;
        let locks = LockManager::new(store.pool(), store.command_timeout());
        Ok(Self { store, locks })
    }

    /// Round-trip connectivity check
    pub async fn ping(&self) -> CacheResult<()> {
        self.store.ping().await
    }

    /// Fetch and deserialize a cached value. Transport errors and
    /// undecodable payloads are treated as misses.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get_raw(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("cached payload under {} is not decodable ({}), treating as miss", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("cache read for {} failed ({}), treating as miss", key, e);
                None
            }
        }
    }

    /// Fetch the raw stored value without a target type; JSON payloads come
    /// back decoded, legacy plain strings come back as string values.
    pub async fn get_value(&self, key: &str) -> Option<serde_json::Value> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("cache read for {} failed ({}), treating as miss", key, e);
                None
            }
        }
    }

    /// Serialize and store a value with an expiry. A failed write degrades
    /// to cache-miss behavior for later readers; the caller is never blocked.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, expiry: Duration) {
        let json = match serde_json::to_value(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("refusing to cache {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.store.set(key, &json, expiry).await {
            warn!("cache write for {} failed ({}), skipping", key, e);
        }
    }

    /// Delete a single key; absence and transport failure are both no-ops.
    pub async fn delete(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            warn!("cache delete for {} failed ({}), entry will expire naturally", key, e);
        }
    }

    /// Delete every key matching a glob via a cursor-based sweep.
    pub async fn delete_pattern(&self, pattern: &str) {
        if let Err(e) = self.store.delete_pattern(pattern).await {
            warn!("cache sweep for {} failed ({}), entries will expire naturally", pattern, e);
        }
    }

    /// Read-through lookup: return the cached value on hit; on miss invoke
    /// the loader against persistence, populate the cache with `expiry`, and
    /// return the loaded value.
    ///
    /// Concurrent misses on the same key each run the loader; stampedes are
    /// accepted and bounded by the entry expiry.
    pub async fn read_through<T, F, Fut>(&self, key: &str, expiry: Duration, loader: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(cached) = self.get::<T>(key).await {
            debug!("read-through hit for {}", key);
            return Ok(cached);
        }

        debug!("read-through miss for {}, loading from persistence", key);
        let value = loader().await?;
        self.set(key, &value, expiry).await;
        Ok(value)
    }

    /// Single non-blocking lock attempt; `None` signals contention and the
    /// caller should report busy/retry upstream.
    pub async fn acquire_lock(&self, lock_key: &str, ttl: Duration) -> Option<LockToken> {
        self.locks.acquire(lock_key, ttl).await
    }

    /// Best-effort lock release.
    pub async fn release_lock(&self, token: LockToken) {
        self.locks.release(token).await;
    }

    /// Acquire the pair of locks guarding a medicine mutation: the list lock
    /// and the per-entity lock. On partial acquisition the held lock is
    /// released and `None` is returned; the caller must not touch
    /// persistence without both.
    pub async fn guard_mutation(&self, id: &Uuid) -> Option<MutationLocks> {
        let list = self.locks.acquire(keys::LIST_LOCK_KEY, keys::LOCK_TIMEOUT).await?;

        match self.locks.acquire(&keys::detail_lock_key(id), keys::LOCK_TIMEOUT).await {
            Some(detail) => Some(MutationLocks { list, detail }),
            None => {
                self.locks.release(list).await;
                None
            }
        }
    }

    /// Release both mutation locks. Call this on every exit path of a
    /// mutation, including failed persistence writes.
    pub async fn release_mutation_locks(&self, locks: MutationLocks) {
        self.locks.release(locks.detail).await;
        self.locks.release(locks.list).await;
    }
}
