use std::time::Duration;

use redis_connection::{
    CacheAside, CacheStore, MemoryConfig, RedisDbConfig, core::CacheBackend,
};

pub fn memory_store() -> CacheStore { CacheStore::memory(MemoryConfig::default()) }

pub fn memory_cache() -> CacheAside { CacheAside::enabled(memory_store()) }

/// A Redis-backed store pointed at a port nothing listens on: every
/// operation fails with `StoreUnavailable` (or `Timeout`).
pub fn unreachable_store() -> CacheStore {
    let config = RedisDbConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        ..RedisDbConfig::default()
    };
    let pool = redis_connection::redis_pool(&config)
        .expect("pool creation is lazy and never dials");
    CacheStore::from_backend(CacheBackend::Redis(pool))
        .with_operation_timeout(Duration::from_millis(500))
}

pub fn unreachable_cache() -> CacheAside { CacheAside::enabled(unreachable_store()) }
