use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::cache::{CacheError, CacheResult};

/// Redis connection settings for the cache subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,
    /// Per-command timeout; bounds worst-case latency of any store round-trip
    pub command_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            command_timeout_ms: 5000,
        }
    }
}

/// Key-value store adapter over a pooled Redis connection.
///
/// Payloads are JSON-encoded UTF-8 text. Reads tolerate legacy entries that
/// were written as plain strings: anything that does not parse as JSON comes
/// back as a JSON string value. All errors are typed; the fail-open policy
/// lives one layer up in the `CacheManager`.
pub struct RedisStore {
    pool: Pool,
    command_timeout: Duration,
}

impl RedisStore {
    /// Create the connection pool and verify connectivity with a ping.
    ///
    /// A failed ping is reported but the store is still constructed: the
    /// cache is an optimization, and the service must come up (degraded)
    /// when Redis is down.
    pub async fn connect(config: &RedisConfig) -> CacheResult<Self> {
        let pool_config = Config::from_url(&config.url);
        let pool = pool_config
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| CacheError::ConfigurationError(format!("Invalid Redis URL {}: {}", config.url, e)))?;

        let store = Self {
            pool,
            command_timeout: Duration::from_millis(config.command_timeout_ms),
        };

        match store.ping().await {
            Ok(()) => info!("Redis store connected at {}", config.url),
            Err(e) => tracing::warn!("Redis unreachable at startup ({}), continuing without cache", e),
        }

        Ok(store)
    }

    pub async fn ping(&self) -> CacheResult<()> {
        let pool = self.pool.clone();
        let _: String = self
            .run("PING", "-", async move {
                let mut conn = pool.get().await.map_err(pool_error)?;
                redis::cmd("PING").query_async(&mut conn).await
            })
            .await?;
        Ok(())
    }

    /// Execute a Redis operation under the configured command timeout
    async fn run<T, F>(&self, op: &str, key: &str, fut: F) -> CacheResult<T>
    where
        F: std::future::Future<Output = redis::RedisResult<T>>,
    {
        match timeout(self.command_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CacheError::CommandError(format!("{} {}: {}", op, key, e))),
            Err(_) => Err(CacheError::Timeout(self.command_timeout)),
        }
    }

    /// Fetch the raw payload stored under `key`, if any
    pub async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        let pool = self.pool.clone();
        let owned = key.to_string();
        let raw: Option<String> = self
            .run("GET", key, async move {
                let mut conn = pool.get().await.map_err(pool_error)?;
                conn.get(owned).await
            })
            .await?;

        match &raw {
            Some(_) => debug!("cache hit for key {}", key),
            None => debug!("cache miss for key {}", key),
        }
        Ok(raw)
    }

    /// Fetch and decode the payload stored under `key`.
    ///
    /// A payload that parses as JSON is returned decoded; anything else is
    /// returned as a JSON string (legacy non-JSON values).
    pub async fn get(&self, key: &str) -> CacheResult<Option<serde_json::Value>> {
        let raw = self.get_raw(key).await?;
        Ok(raw.map(|payload| {
            serde_json::from_str(&payload).unwrap_or(serde_json::Value::String(payload))
        }))
    }

    /// Store `value` under `key` with a mandatory expiry.
    ///
    /// Objects and arrays are serialized to JSON; scalar values are
    /// stringified. Every entry expires so staleness is bounded even when an
    /// invalidation is missed.
    pub async fn set(&self, key: &str, value: &serde_json::Value, expiry: Duration) -> CacheResult<()> {
        let payload = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                serde_json::to_string(value)
                    .map_err(|e| CacheError::SerializationError(e.to_string()))?
            }
            other => other.to_string(),
        };

        let pool = self.pool.clone();
        let owned = key.to_string();
        let secs = expiry.as_secs().max(1);
        self.run("SETEX", key, async move {
            let mut conn = pool.get().await.map_err(pool_error)?;
            conn.set_ex::<_, _, ()>(owned, payload, secs).await
        })
        .await?;

        debug!("cached key {} for {}s", key, secs);
        Ok(())
    }

    /// Delete `key`. Deleting an absent key is not an error.
    pub async fn delete(&self, key: &str) -> CacheResult<()> {
        let pool = self.pool.clone();
        let owned = key.to_string();
        let removed: u64 = self
            .run("DEL", key, async move {
                let mut conn = pool.get().await.map_err(pool_error)?;
                conn.del(owned).await
            })
            .await?;

        debug!("deleted key {} (existed: {})", key, removed > 0);
        Ok(())
    }

    /// Delete every key matching `pattern` using a cursor-based SCAN sweep.
    ///
    /// SCAN keeps each round-trip short; the blocking KEYS command is never
    /// issued. Returns the number of keys removed.
    pub async fn delete_pattern(&self, pattern: &str) -> CacheResult<u64> {
        let mut removed: u64 = 0;
        let mut cursor: u64 = 0;

        loop {
            let pool = self.pool.clone();
            let owned = pattern.to_string();
            let (next, batch): (u64, Vec<String>) = self
                .run("SCAN", pattern, async move {
                    let mut conn = pool.get().await.map_err(pool_error)?;
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(owned)
                        .arg("COUNT")
                        .arg(100)
                        .query_async(&mut conn)
                        .await
                })
                .await?;

            if !batch.is_empty() {
                let pool = self.pool.clone();
                let count: u64 = self
                    .run("DEL", pattern, async move {
                        let mut conn = pool.get().await.map_err(pool_error)?;
                        conn.del(batch).await
                    })
                    .await?;
                removed += count;
            }

            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        info!("deleted {} keys matching pattern {}", removed, pattern);
        Ok(removed)
    }

    pub(crate) fn pool(&self) -> Pool {
        self.pool.clone()
    }

    pub(crate) fn command_timeout(&self) -> Duration {
        self.command_timeout
    }
}

fn pool_error(e: deadpool_redis::PoolError) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::IoError, "Pool error", e.to_string()))
}
