use super::key::CacheKey;
use crate::{store::CacheStore, types::normal::Normal};

/// Binds a typed key to a store, producing a slot that reads and writes
/// `CacheKey::Value` under the derived key string.
pub trait CacheTypeBind: CacheKey {
    fn bind_with_args<'cache>(
        &self, store: &'cache CacheStore, args: <Self as CacheKey>::Args<'_>,
    ) -> Normal<'cache, Self::Value> {
        let key = CacheKey::get_key_with_args(self, args);
        Normal::new(store, key)
    }
}

impl<K> CacheTypeBind for K where K: CacheKey + ?Sized {}
