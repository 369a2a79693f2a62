use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Key not found: {key}")]
    NotFound { key: String },
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Deserialization failed: {0}")]
    Deserialization(String),
    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Cache operation timed out")]
    Timeout,
}

impl CacheError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }
}

impl From<deadpool_redis::PoolError> for CacheError {
    fn from(err: deadpool_redis::PoolError) -> Self {
        match err {
            deadpool_redis::PoolError::Timeout(_) => CacheError::Timeout,
            other => CacheError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<deadpool_redis::redis::RedisError> for CacheError {
    fn from(err: deadpool_redis::redis::RedisError) -> Self {
        if err.is_timeout() {
            CacheError::Timeout
        }
        else {
            CacheError::StoreUnavailable(err.to_string())
        }
    }
}

pub type CacheResult<T> = Result<T, CacheError>;
