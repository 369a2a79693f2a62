use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use bytes::Bytes;
use deadpool_redis::redis::{self, AsyncCommands};
use moka::{Expiry, future::Cache};

use super::error::{CacheError, CacheResult};
use crate::config::MemoryConfig;

/// A serialized value held by the in-process backend together with the TTL
/// it was written with.
#[derive(Clone, Debug)]
pub struct MemoryEntry {
    bytes: Bytes,
    ttl: Duration,
}

/// Gives every memory entry its own expiry, mirroring `PSETEX` on Redis.
struct PerEntryTtl;

impl Expiry<String, MemoryEntry> for PerEntryTtl {
    fn expire_after_create(
        &self, _key: &String, value: &MemoryEntry, _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self, _key: &String, value: &MemoryEntry, _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Represents the different cache backend types
pub enum CacheBackend {
    /// Redis backend using a deadpool connection pool
    Redis(deadpool_redis::Pool),

    /// In-memory cache backend. Once closed, every operation is rejected.
    Memory {
        cache: Cache<String, MemoryEntry>,
        closed: AtomicBool,
    },
}

impl From<deadpool_redis::Pool> for CacheBackend {
    fn from(pool: deadpool_redis::Pool) -> Self { CacheBackend::Redis(pool) }
}

impl CacheBackend {
    pub fn memory(config: MemoryConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .expire_after(PerEntryTtl)
            .build();
        CacheBackend::Memory {
            cache,
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_redis(&self) -> bool { matches!(self, CacheBackend::Redis(_)) }

    pub(crate) async fn ping(&self) -> CacheResult<()> {
        match self {
            CacheBackend::Redis(pool) => {
                let mut conn = pool.get().await?;
                let _: String =
                    redis::cmd("PING").query_async(&mut conn).await?;
                Ok(())
            }
            CacheBackend::Memory { closed, .. } => ensure_open(closed),
        }
    }

    pub(crate) async fn set_raw(
        &self, key: &str, bytes: Vec<u8>, ttl: Duration,
    ) -> CacheResult<()> {
        match self {
            CacheBackend::Redis(pool) => {
                let mut conn = pool.get().await?;
                let millis = expiry_millis(ttl);
                let _: () = conn.pset_ex(key, bytes, millis).await?;
                Ok(())
            }
            CacheBackend::Memory { cache, closed } => {
                ensure_open(closed)?;
                let entry = MemoryEntry {
                    bytes: Bytes::from(bytes),
                    ttl,
                };
                cache.insert(key.to_string(), entry).await;
                Ok(())
            }
        }
    }

    pub(crate) async fn get_raw(
        &self, key: &str,
    ) -> CacheResult<Option<Vec<u8>>> {
        match self {
            CacheBackend::Redis(pool) => {
                let mut conn = pool.get().await?;
                let value: Option<Vec<u8>> = conn.get(key).await?;
                Ok(value)
            }
            CacheBackend::Memory { cache, closed } => {
                ensure_open(closed)?;
                Ok(cache.get(key).await.map(|entry| entry.bytes.to_vec()))
            }
        }
    }

    pub(crate) async fn delete(&self, keys: &[String]) -> CacheResult<()> {
        match self {
            CacheBackend::Redis(pool) => {
                let mut conn = pool.get().await?;
                let _: () = conn.del(keys.to_vec()).await?;
                Ok(())
            }
            CacheBackend::Memory { cache, closed } => {
                ensure_open(closed)?;
                for key in keys {
                    cache.invalidate(key).await;
                }
                Ok(())
            }
        }
    }

    pub(crate) fn close(&self) {
        match self {
            CacheBackend::Redis(pool) => pool.close(),
            CacheBackend::Memory { cache, closed } => {
                closed.store(true, Ordering::Release);
                cache.invalidate_all();
            }
        }
    }
}

/// `PSETEX` expiry for `ttl`: at least one millisecond, saturating at
/// `u64::MAX`.
fn expiry_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

fn ensure_open(closed: &AtomicBool) -> CacheResult<()> {
    if closed.load(Ordering::Acquire) {
        return Err(CacheError::StoreUnavailable(
            "cache store closed".to_string(),
        ));
    }
    Ok(())
}
