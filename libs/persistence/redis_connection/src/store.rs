use std::{future::Future, sync::Arc, time::Duration};

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument};

use crate::{
    config::{DbConnectConfig, MemoryConfig},
    core::{
        backend::CacheBackend,
        error::{CacheError, CacheResult},
        value::{self, CacheValue, Json},
    },
    redis_pool,
};

/// Upper bound for the liveness probe performed by [`CacheStore::connect`].
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound for a single get/set/delete round-trip.
pub const OPERATION_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared handle to a TTL-capable key/value store.
///
/// Cloning is cheap and every clone talks to the same backend, so one handle
/// can be injected into any number of repositories.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<CacheBackend>,
    op_timeout: Duration,
}

impl CacheStore {
    pub fn from_backend(backend: CacheBackend) -> Self {
        Self {
            backend: Arc::new(backend),
            op_timeout: OPERATION_TIMEOUT,
        }
    }

    /// Builds a Redis-backed store and probes it with `PING`.
    ///
    /// Fails fast when the probe fails or exceeds [`PROBE_TIMEOUT`], leaving
    /// the caller to decide whether to run without a cache.
    #[instrument(skip_all, name = "connect-redis")]
    pub async fn connect<C>(config: &C) -> CacheResult<Self>
    where
        C: DbConnectConfig,
    {
        let pool = redis_pool(config)?;
        let store = Self::from_backend(CacheBackend::Redis(pool));

        tokio::time::timeout(PROBE_TIMEOUT, store.backend.ping())
            .await
            .map_err(|_| CacheError::Timeout)??;

        info!(
            redis.host = config.host(),
            redis.port = config.port(),
            redis.db = config.db(),
            "Redis cache reachable"
        );
        Ok(store)
    }

    /// In-process store with per-entry expiry.
    pub fn memory(config: MemoryConfig) -> Self {
        Self::from_backend(CacheBackend::memory(config))
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = timeout;
        self
    }

    pub fn backend(&self) -> &CacheBackend { &self.backend }

    /// Serializes `value` and stores it under `key`, replacing any previous
    /// entry. The entry expires after `ttl`.
    pub async fn set<T>(
        &self, key: &str, value: &T, ttl: Duration,
    ) -> CacheResult<()>
    where
        T: Serialize + ?Sized,
    {
        let bytes = value::encode(value)?;
        self.bounded(self.backend.set_raw(key, bytes, ttl)).await
    }

    /// Reads `key` and decodes it as `T`; a missing key is
    /// [`CacheError::NotFound`].
    pub async fn get<T>(&self, key: &str) -> CacheResult<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        let bytes = self
            .bounded(self.backend.get_raw(key))
            .await?
            .ok_or_else(|| {
                CacheError::NotFound {
                    key: key.to_string(),
                }
            })?;
        Json::<T>::from_bytes(&bytes).map(Json::inner)
    }

    /// Removes every key in `keys`. Absent keys are ignored.
    pub async fn delete<K>(&self, keys: &[K]) -> CacheResult<()>
    where
        K: AsRef<str>,
    {
        if keys.is_empty() {
            return Ok(());
        }
        let keys: Vec<String> =
            keys.iter().map(|key| key.as_ref().to_string()).collect();
        debug!(cache.keys = ?keys, "deleting cache keys");
        self.bounded(self.backend.delete(&keys)).await
    }

    /// Releases the backend. Later operations on any clone fail with
    /// [`CacheError::StoreUnavailable`].
    pub fn close(&self) {
        self.backend.close();
        info!("cache store closed");
    }

    async fn bounded<F, T>(&self, operation: F) -> CacheResult<T>
    where
        F: Future<Output = CacheResult<T>>,
    {
        tokio::time::timeout(self.op_timeout, operation)
            .await
            .map_err(|_| CacheError::Timeout)?
    }
}
