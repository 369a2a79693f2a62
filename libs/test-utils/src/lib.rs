pub mod cache;
pub mod fakes;
pub mod postgres;
pub mod redis;
pub mod test_helpers;

pub use cache::{memory_cache, memory_store, unreachable_cache, unreachable_store};
pub use fakes::{InMemoryEventDao, InMemoryUserDao};
pub use postgres::TestPostgresContainer;
pub use redis::TestRedisContainer;
pub use test_helpers::*;

/// Tables used by the Postgres DAOs.
pub const SCHEMA_SQL: &str = include_str!("schema.sql");
