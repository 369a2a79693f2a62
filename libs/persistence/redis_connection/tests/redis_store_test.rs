use std::time::Duration;

use redis_connection::{CacheAside, CacheStore, cache_key};
use serde::{Deserialize, Serialize};
use test_utils::TestRedisContainer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    id: i64,
    city: String,
}

cache_key!(VenueKey::<Venue> => "venue:{}"[id: i64]);

fn berlin() -> Venue {
    Venue {
        id: 1,
        city: "Berlin".to_string(),
    }
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_connect_probes_live_redis() -> anyhow::Result<()> {
    let redis = TestRedisContainer::new().await?;

    let store = CacheStore::connect(&redis.config).await?;

    assert!(store.backend().is_redis());
    store.close();
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_set_get_delete_roundtrip() -> anyhow::Result<()> {
    let redis = TestRedisContainer::new().await?;
    redis.flush_db().await?;
    let store = redis.store();

    store.set("venue:1", &berlin(), Duration::from_secs(60)).await?;
    assert_eq!(store.get::<Venue>("venue:1").await?, berlin());

    store.delete(&["venue:1", "venue:2"]).await?;
    store.delete(&["venue:1"]).await?;
    assert!(store.get::<Venue>("venue:1").await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_entries_carry_their_ttl() -> anyhow::Result<()> {
    let redis = TestRedisContainer::new().await?;
    let store = redis.store();

    store.set("venue:1", &berlin(), Duration::from_secs(30)).await?;
    let pttl = redis.pttl("venue:1").await?;
    assert!(pttl > 0 && pttl <= 30_000);

    store.set("venue:2", &berlin(), Duration::from_millis(200)).await?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(store.get::<Venue>("venue:2").await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
#[ignore = "requires docker"]
async fn test_cache_aside_over_redis() -> anyhow::Result<()> {
    let redis = TestRedisContainer::new().await?;
    let cache = CacheAside::enabled(redis.store());

    cache
        .populate(&VenueKey, (&1,), &berlin(), Duration::from_secs(60))
        .await;

    assert_eq!(cache.lookup(&VenueKey, (&1,)).await, Some(berlin()));
    Ok(())
}
