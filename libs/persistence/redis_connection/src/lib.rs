use deadpool_redis::{Config, Pool, PoolConfig, Runtime};
use tracing::{info, instrument};
use url::Url;

pub mod aside;
pub mod config;
pub mod core;
pub mod macros;
pub mod store;
pub mod types;

pub use aside::CacheAside;
pub use config::{CacheTtl, CacheTtlConfig, MemoryConfig, RedisDbConfig};
pub use crate::core::{CacheError, CacheKey, CacheResult, CacheTypeBind};
pub use store::CacheStore;

const POOL_SIZE: usize = 16;
const CREATE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);

/// Builds the Redis URL for `config`. The password, when present, is placed
/// in the userinfo section.
pub fn redis_url<C>(config: &C) -> Result<Url, CacheError>
where
    C: config::DbConnectConfig,
{
    let mut url = Url::parse(&format!(
        "redis://{}:{}/{}",
        config.host(),
        config.port(),
        config.db()
    ))
    .map_err(|e| {
        CacheError::StoreUnavailable(format!("invalid redis url: {e}"))
    })?;

    if let Some(password) = config.password() {
        url.set_password(Some(password)).map_err(|()| {
            CacheError::StoreUnavailable(
                "redis url cannot carry credentials".to_string(),
            )
        })?;
    }

    Ok(url)
}

/// Creates the connection pool. No connection is opened until first use.
#[instrument(skip_all, name = "redis-pool")]
pub fn redis_pool<C>(config: &C) -> Result<Pool, CacheError>
where
    C: config::DbConnectConfig,
{
    let url = redis_url(config)?;

    info!(
        redis.host = config.host(),
        redis.port = config.port(),
        redis.db = config.db(),
        redis.auth = config.password().is_some()
    );

    let mut pool_config = PoolConfig::new(POOL_SIZE);
    pool_config.timeouts.wait = Some(CREATE_TIMEOUT);
    pool_config.timeouts.create = Some(CREATE_TIMEOUT);

    let mut cfg = Config::from_url(url.as_str());
    cfg.pool = Some(pool_config);

    cfg.create_pool(Some(Runtime::Tokio1))
        .map_err(|e| CacheError::StoreUnavailable(e.to_string()))
}
