use std::time::Duration;

pub trait DbConnectConfig {
    fn password(&self) -> Option<&str> { None }
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn db(&self) -> u8;
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RedisDbConfig {
    #[serde(default = "host_default")]
    pub host: String,
    #[serde(default = "port_default")]
    pub port: u16,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "db_default")]
    pub db: u8,
}

impl Default for RedisDbConfig {
    fn default() -> Self {
        Self {
            host: host_default(),
            port: port_default(),
            password: None,
            db: db_default(),
        }
    }
}

impl DbConnectConfig for RedisDbConfig {
    fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|password| !password.is_empty())
    }

    fn host(&self) -> &str { &self.host }

    fn port(&self) -> u16 { self.port }

    fn db(&self) -> u8 { self.db }
}

/// Settings for the in-process backend. Entries carry their own TTL, the
/// capacity bounds the number of live keys.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_memory_capacity")]
    pub capacity: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_memory_capacity(),
        }
    }
}

#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct CacheTtlConfig {
    #[serde(default = "default_entity_ttl_secs")]
    pub entity_ttl_secs: u64,
    #[serde(default = "default_list_ttl_secs")]
    pub list_ttl_secs: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            entity_ttl_secs: default_entity_ttl_secs(),
            list_ttl_secs: default_list_ttl_secs(),
        }
    }
}

/// Expiry applied by a repository: one TTL for single-entity keys, one for
/// collection keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub entity: Duration,
    pub collection: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self { CacheTtlConfig::default().into() }
}

impl From<CacheTtlConfig> for CacheTtl {
    fn from(config: CacheTtlConfig) -> Self {
        Self {
            entity: Duration::from_secs(config.entity_ttl_secs),
            collection: Duration::from_secs(config.list_ttl_secs),
        }
    }
}

fn host_default() -> String { "localhost".into() }
fn port_default() -> u16 { 6379 }
fn db_default() -> u8 { 0 }
fn default_memory_capacity() -> u64 { 10_000 }
fn default_entity_ttl_secs() -> u64 { 30 * 60 }
fn default_list_ttl_secs() -> u64 { 15 * 60 }
