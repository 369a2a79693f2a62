use std::borrow::Cow;

use serde::{Serialize, de::DeserializeOwned};

/// A deterministic cache key for one entity kind and lookup path.
///
/// `Value` is the shape stored under the key, so a key can only ever be read
/// back as what was written to it.
pub trait CacheKey {
    type Args<'r>;
    type Value: Serialize + DeserializeOwned + Send + Sync + 'static;

    fn get_key_with_args(&self, args: Self::Args<'_>) -> Cow<'static, str>;

    fn get_key(&self) -> Cow<'static, str>
    where
        for<'r> Self::Args<'r>: CacheKeyAutoConstruct,
    {
        CacheKey::get_key_with_args(self, CacheKeyAutoConstruct::construct())
    }
}

pub trait CacheKeyAutoConstruct {
    fn construct() -> Self;
}

impl CacheKeyAutoConstruct for () {
    fn construct() -> Self {}
}
