use std::time::Duration;

use anyhow::{Context, Result};
use deadpool_redis::Pool;
use redis_connection::{CacheStore, RedisDbConfig, core::CacheBackend};
use testcontainers_modules::{
    redis::Redis,
    testcontainers::{ContainerAsync, runners::AsyncRunner},
};
use tokio::time::sleep;

/// Throwaway Redis instance.
pub struct TestRedisContainer {
    pub pool: Pool,
    pub config: RedisDbConfig,
    // Keep the container alive for the lifetime of this struct
    _container: ContainerAsync<Redis>,
}

impl TestRedisContainer {
    pub async fn new() -> Result<Self> {
        let container = Redis::default()
            .start()
            .await
            .context("Failed to start Redis container")?;

        let config = RedisDbConfig {
            host: container.get_host().await?.to_string(),
            port: container.get_host_port_ipv4(6379).await?,
            ..RedisDbConfig::default()
        };
        let pool = redis_connection::redis_pool(&config)?;
        Self::wait_until_ready(&pool).await?;

        Ok(Self {
            pool,
            config,
            _container: container,
        })
    }

    async fn wait_until_ready(pool: &Pool) -> Result<()> {
        const MAX_ATTEMPTS: u32 = 20;

        let mut attempts = 0;
        loop {
            if let Ok(mut conn) = pool.get().await {
                let pong = deadpool_redis::redis::cmd("PING")
                    .query_async::<String>(&mut conn)
                    .await;
                if pong.is_ok() {
                    return Ok(());
                }
            }
            attempts += 1;
            if attempts >= MAX_ATTEMPTS {
                anyhow::bail!("Redis not ready after {MAX_ATTEMPTS} attempts");
            }
            sleep(Duration::from_millis(500)).await;
        }
    }

    /// A store sharing this container's pool.
    pub fn store(&self) -> CacheStore {
        CacheStore::from_backend(CacheBackend::Redis(self.pool.clone()))
    }

    pub async fn get_connection(&self) -> Result<deadpool_redis::Connection> {
        Ok(self.pool.get().await?)
    }

    pub async fn flush_db(&self) -> Result<()> {
        let mut conn = self.get_connection().await?;
        deadpool_redis::redis::cmd("FLUSHDB")
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    /// Remaining time to live of `key` in milliseconds; negative when the key
    /// is missing or has no expiry.
    pub async fn pttl(&self, key: &str) -> Result<i64> {
        let mut conn = self.get_connection().await?;
        let ttl = deadpool_redis::redis::cmd("PTTL")
            .arg(key)
            .query_async::<i64>(&mut conn)
            .await?;
        Ok(ttl)
    }
}
