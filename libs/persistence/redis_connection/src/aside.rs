use std::{borrow::Cow, time::Duration};

use tracing::{debug, warn};

use crate::{
    core::{key::CacheKey, type_bind::CacheTypeBind},
    store::CacheStore,
};

/// Optional cache capability held by a repository.
///
/// Reads through it fail open: a miss, a decode failure and an unreachable
/// store all look like "not cached". Writes through it (`populate`,
/// `invalidate`) never fail: errors are logged and dropped, TTL expiry is
/// the backstop. When no store is attached every call is a no-op.
#[derive(Clone, Default)]
pub struct CacheAside {
    store: Option<CacheStore>,
}

impl CacheAside {
    pub fn enabled(store: CacheStore) -> Self { Self { store: Some(store) } }

    /// Direct-store mode.
    pub fn disabled() -> Self { Self { store: None } }

    pub fn is_enabled(&self) -> bool { self.store.is_some() }

    pub async fn lookup<K>(
        &self, key: &K, args: <K as CacheKey>::Args<'_>,
    ) -> Option<K::Value>
    where
        K: CacheKey,
    {
        let store = self.store.as_ref()?;
        let slot = key.bind_with_args(store, args);

        match slot.try_get().await {
            Ok(Some(value)) => {
                debug!(cache.key = slot.key(), "cache hit");
                Some(value)
            }
            Ok(None) => {
                debug!(cache.key = slot.key(), "cache miss");
                None
            }
            Err(err) => {
                warn!(
                    cache.key = slot.key(),
                    error = %err,
                    "cache read failed, falling back to source of truth"
                );
                None
            }
        }
    }

    pub async fn populate<K>(
        &self, key: &K, args: <K as CacheKey>::Args<'_>, value: &K::Value,
        ttl: Duration,
    ) where
        K: CacheKey,
    {
        let Some(store) = self.store.as_ref()
        else {
            return;
        };
        let slot = key.bind_with_args(store, args);

        if let Err(err) = slot.set_with_expire(value, ttl).await {
            warn!(cache.key = slot.key(), error = %err, "cache populate failed");
        }
    }

    pub async fn invalidate<I>(&self, keys: I)
    where
        I: IntoIterator<Item = Cow<'static, str>>,
    {
        let Some(store) = self.store.as_ref()
        else {
            return;
        };
        let keys: Vec<Cow<'static, str>> = keys.into_iter().collect();

        if let Err(err) = store.delete(&keys).await {
            warn!(
                cache.keys = ?keys,
                error = %err,
                "cache invalidation failed"
            );
        }
    }

    pub fn close(&self) {
        if let Some(store) = &self.store {
            store.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::{cache_key, config::MemoryConfig};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Item {
        id: i64,
    }

    cache_key!(ItemKey::<Item> => "item:{}"[id: i64]);
    cache_key!(ItemListKey::<Vec<Item>> => "items:list");

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_disabled_capability_is_a_no_op() {
        let cache = CacheAside::disabled();

        cache.populate(&ItemKey, (&1,), &Item { id: 1 }, TTL).await;
        cache.invalidate([ItemListKey.get_key()]).await;

        assert!(!cache.is_enabled());
        assert_eq!(cache.lookup(&ItemKey, (&1,)).await, None);
    }

    #[tokio::test]
    async fn test_populate_then_lookup() {
        let cache =
            CacheAside::enabled(CacheStore::memory(MemoryConfig::default()));

        cache.populate(&ItemKey, (&1,), &Item { id: 1 }, TTL).await;

        assert_eq!(cache.lookup(&ItemKey, (&1,)).await, Some(Item { id: 1 }));
        assert_eq!(cache.lookup(&ItemKey, (&2,)).await, None);
    }

    #[tokio::test]
    async fn test_malformed_entry_reads_as_miss() {
        let store = CacheStore::memory(MemoryConfig::default());
        store.set("item:1", "not an item", TTL).await.unwrap();
        let cache = CacheAside::enabled(store);

        assert_eq!(cache.lookup(&ItemKey, (&1,)).await, None);
    }

    #[tokio::test]
    async fn test_invalidate_removes_every_key() {
        let store = CacheStore::memory(MemoryConfig::default());
        let cache = CacheAside::enabled(store.clone());
        cache.populate(&ItemKey, (&1,), &Item { id: 1 }, TTL).await;
        cache.populate(&ItemListKey, (), &vec![Item { id: 1 }], TTL).await;

        cache
            .invalidate([
                ItemKey.get_key_with_args((&1,)),
                ItemListKey.get_key(),
            ])
            .await;

        assert_eq!(cache.lookup(&ItemKey, (&1,)).await, None);
        assert_eq!(cache.lookup(&ItemListKey, ()).await, None);
    }
}
