use serde::{Serialize, de::DeserializeOwned};

use super::error::CacheError;

/// Encodes any serializable value the way `Json<T>` stores it.
pub fn encode<T>(value: &T) -> Result<Vec<u8>, CacheError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_vec(value)
        .map_err(|e| CacheError::Serialization(e.to_string()))
}

/// The unified trait for all cacheable values
pub trait CacheValue: Sized + Send + Sync {
    fn to_bytes(&self) -> Result<Vec<u8>, CacheError>;

    fn from_bytes(bytes: &[u8]) -> Result<Self, CacheError>;
}

/// JSON wrapper used for every record and collection stored in the cache.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn inner(self) -> T { self.0 }
}

impl<T> CacheValue for Json<T>
where
    T: Serialize + DeserializeOwned + Send + Sync,
{
    fn to_bytes(&self) -> Result<Vec<u8>, CacheError> { encode(&self.0) }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CacheError> {
        serde_json::from_slice(bytes)
            .map(Json)
            .map_err(|e| CacheError::Deserialization(e.to_string()))
    }
}
