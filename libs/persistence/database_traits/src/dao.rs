use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// Key-based CRUD over the source of truth.
///
/// Single-row reads return `Ok(None)` when no row matches so callers can
/// tell "does not exist" apart from "lookup failed".
#[async_trait]
pub trait GenericDao: Send + Sync {
    type Model: Send + Sync + 'static;
    type CreateRequest: Send + Sync + 'static;
    type UpdateRequest: Send + Sync + 'static;
    type Error: Send + 'static;
    type ID: Serialize + DeserializeOwned + Copy + Send + Sync + 'static;

    async fn find_by_id(
        &self, id: Self::ID,
    ) -> Result<Option<Self::Model>, Self::Error>;

    async fn all(&self) -> Result<Vec<Self::Model>, Self::Error>;

    async fn create(
        &self, req: Self::CreateRequest,
    ) -> Result<Self::Model, Self::Error>;

    /// Returns the row as stored after the update.
    async fn update(
        &self, id: Self::ID, req: Self::UpdateRequest,
    ) -> Result<Self::Model, Self::Error>;

    async fn delete(&self, id: Self::ID) -> Result<(), Self::Error>;
}
