use deadpool_redis::Pool;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Token proving ownership of a named lock.
///
/// The holder id is compared on release so an expired lock that was
/// re-acquired by another writer is never deleted out from under them.
#[derive(Debug, Clone)]
pub struct LockToken {
    key: String,
    holder: String,
}

impl LockToken {
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Distributed mutual-exclusion over Redis.
///
/// Locks serialize racing writers against the same logical resource; they are
/// a mutual-exclusion hint, not a consensus primitive. The TTL bounds how
/// long a crashed holder can wedge a key, and a caller that fails to acquire
/// must surface busy/retry upstream instead of spinning.
pub struct LockManager {
    pool: Pool,
    command_timeout: Duration,
}

/// Release only succeeds for the holder that acquired the lock.
const RELEASE_SCRIPT: &str = r#"
    if redis.call('GET', KEYS[1]) == ARGV[1] then
        return redis.call('DEL', KEYS[1])
    else
        return 0
    end
"#;

impl LockManager {
    pub fn new(pool: Pool, command_timeout: Duration) -> Self {
        Self {
            pool,
            command_timeout,
        }
    }

    /// Try to acquire `lock_key` with a single non-blocking attempt.
    ///
    /// Returns `None` on contention or when Redis is unreachable; both are
    /// routine outcomes, not errors. The lock auto-expires after `ttl` if the
    /// holder crashes or forgets to release.
    pub async fn acquire(&self, lock_key: &str, ttl: Duration) -> Option<LockToken> {
        let holder = Uuid::new_v4().to_string();
        let pool = self.pool.clone();
        let key = lock_key.to_string();
        let value = holder.clone();
        let secs = ttl.as_secs().max(1);

        let attempt = async move {
            let mut conn = pool.get().await.map_err(|e| {
                redis::RedisError::from((redis::ErrorKind::IoError, "Pool error", e.to_string()))
            })?;
            redis::cmd("SET")
                .arg(&key)
                .arg(&value)
                .arg("NX")
                .arg("EX")
                .arg(secs)
                .query_async::<_, Option<String>>(&mut conn)
                .await
        };

        match timeout(self.command_timeout, attempt).await {
            Ok(Ok(Some(_))) => {
                info!("acquired lock on key {}", lock_key);
                Some(LockToken {
                    key: lock_key.to_string(),
                    holder,
                })
            }
            Ok(Ok(None)) => {
                warn!("failed to acquire lock on key {} (held elsewhere)", lock_key);
                None
            }
            Ok(Err(e)) => {
                warn!("lock acquire on {} failed: {}", lock_key, e);
                None
            }
            Err(_) => {
                warn!("lock acquire on {} timed out", lock_key);
                None
            }
        }
    }

    /// Release a held lock. Best-effort: if the lock already expired or was
    /// reclaimed by another holder this is a no-op, logged and swallowed.
    pub async fn release(&self, token: LockToken) {
        let pool = self.pool.clone();
        let attempt = async move {
            let mut conn = pool.get().await.map_err(|e| {
                redis::RedisError::from((redis::ErrorKind::IoError, "Pool error", e.to_string()))
            })?;
            let released: i64 = redis::Script::new(RELEASE_SCRIPT)
                .key(&token.key)
                .arg(&token.holder)
                .invoke_async(&mut conn)
                .await?;
            Ok::<i64, redis::RedisError>(released)
        };

        match timeout(self.command_timeout, attempt).await {
            Ok(Ok(1)) => debug!("released lock"),
            Ok(Ok(_)) => debug!("lock already expired or reclaimed, nothing to release"),
            Ok(Err(e)) => warn!("error releasing lock: {}", e),
            Err(_) => warn!("lock release timed out"),
        }
    }
}
