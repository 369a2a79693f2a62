use redis_connection::{CacheTtl, CacheTtlConfig, RedisDbConfig};
use sql_connection::PostgresDbConfig;

/// Process configuration assembled from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub postgres: PostgresDbConfig,
    pub redis: RedisDbConfig,
    pub ttl: CacheTtl,
}

impl AppConfig {
    pub fn from_env() -> Self { Self::from_lookup(|key| std::env::var(key).ok()) }

    /// Unset or unparsable values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let postgres_defaults = PostgresDbConfig::default();
        let redis_defaults = RedisDbConfig::default();
        let ttl_defaults = CacheTtlConfig::default();

        let postgres = PostgresDbConfig {
            uri: lookup("PG_URI")
                .or_else(|| lookup("DATABASE_URL"))
                .unwrap_or(postgres_defaults.uri),
            max_conn: parsed(&lookup, "PG_MAX_CONN"),
            min_conn: parsed(&lookup, "PG_MIN_CONN"),
        };

        let redis = RedisDbConfig {
            host: lookup("REDIS_HOST").unwrap_or(redis_defaults.host),
            port: parsed(&lookup, "REDIS_PORT").unwrap_or(redis_defaults.port),
            password: lookup("REDIS_PASSWORD")
                .filter(|password| !password.is_empty()),
            db: parsed(&lookup, "REDIS_DB").unwrap_or(redis_defaults.db),
        };

        let ttl = CacheTtlConfig {
            entity_ttl_secs: parsed(&lookup, "CACHE_ENTITY_TTL_SECS")
                .unwrap_or(ttl_defaults.entity_ttl_secs),
            list_ttl_secs: parsed(&lookup, "CACHE_LIST_TTL_SECS")
                .unwrap_or(ttl_defaults.list_ttl_secs),
        };

        Self {
            postgres,
            redis,
            ttl: ttl.into(),
        }
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key).and_then(|raw| raw.trim().parse().ok())
}
