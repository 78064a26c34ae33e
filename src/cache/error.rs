use std::time::Duration;
use thiserror::Error;

/// Errors that can occur at the Redis boundary.
///
/// These never escape to HTTP clients: the `CacheManager` maps every read
/// failure to a miss and every write/delete failure to a no-op. Keeping the
/// error typed makes that fail-open mapping an explicit, testable decision
/// instead of a blanket catch-all.
#[derive(Debug, Error, Clone)]
pub enum CacheError {
    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Operation timeout after {0:?}")]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Command failed: {0}")]
    CommandError(String),

    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),
}

impl CacheError {
    /// Check if the error indicates a temporary failure
    pub fn is_temporary(&self) -> bool {
        matches!(
            self,
            CacheError::ConnectionError(_) | CacheError::Timeout(_) | CacheError::CommandError(_)
        )
    }
}

/// Result type for cache store operations
pub type CacheResult<T> = Result<T, CacheError>;
