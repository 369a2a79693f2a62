use std::{borrow::Cow, marker::PhantomData, time::Duration};

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    core::error::{CacheError, CacheResult},
    store::CacheStore,
};

/// A single string slot holding a JSON-encoded `T`.
pub struct Normal<'cache, T> {
    store: &'cache CacheStore,
    key: Cow<'static, str>,
    __phantom: PhantomData<fn() -> T>,
}

impl<'cache, T> Normal<'cache, T> {
    pub fn new(store: &'cache CacheStore, key: Cow<'static, str>) -> Self {
        Self {
            store,
            key,
            __phantom: PhantomData,
        }
    }

    pub fn key(&self) -> &str { &self.key }
}

impl<T> Normal<'_, T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    pub async fn get(&self) -> CacheResult<T> { self.store.get(&self.key).await }

    pub async fn try_get(&self) -> CacheResult<Option<T>> {
        match self.get().await {
            Ok(value) => Ok(Some(value)),
            Err(CacheError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn set_with_expire(
        &self, value: &T, duration: Duration,
    ) -> CacheResult<()> {
        self.store.set(&self.key, value, duration).await
    }
}
