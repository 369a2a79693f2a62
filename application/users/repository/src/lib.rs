use events_cache_keys::EventListCacheKey;
use redis_connection::{CacheAside, CacheKey, CacheTtl};
use tracing::instrument;
use user_cache_keys::{UserByEmailCacheKey, UserCacheKey, UserListCacheKey};
use user_commands::{CreateUserCommand, UpdateUserCommand};
use user_dao::{UserDao, UserStore};
use user_errors::UserError;
use user_models::User;

/// Cache-aside access to users.
///
/// Lookups by id and by email populate separate slots. Writes only
/// invalidate the id slot, so a cached `user:email:<email>` entry may serve
/// the pre-update record until its own TTL runs out.
#[derive(Clone)]
pub struct UserRepository<D = UserDao> {
    dao: D,
    cache: CacheAside,
    ttl: CacheTtl,
}

impl<D> UserRepository<D>
where
    D: UserStore,
{
    pub fn new(dao: D, cache: CacheAside, ttl: CacheTtl) -> Self {
        Self { dao, cache, ttl }
    }

    pub fn dao(&self) -> &D { &self.dao }

    pub fn cache(&self) -> &CacheAside { &self.cache }

    #[instrument(skip(self, command), fields(user.email = %command.email))]
    pub async fn create(
        &self, command: CreateUserCommand,
    ) -> Result<User, UserError> {
        let user = self.dao.create(command).await?;

        self.cache
            .invalidate([
                UserListCacheKey.get_key(),
                EventListCacheKey.get_key(),
            ])
            .await;

        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<User>, UserError> {
        if let Some(user) = self.cache.lookup(&UserCacheKey, (&id,)).await {
            return Ok(Some(user));
        }

        let Some(user) = self.dao.find_by_id(id).await?
        else {
            return Ok(None);
        };
        self.cache
            .populate(&UserCacheKey, (&id,), &user, self.ttl.entity)
            .await;

        Ok(Some(user))
    }

    #[instrument(skip(self))]
    pub async fn get_by_email(
        &self, email: &str,
    ) -> Result<Option<User>, UserError> {
        if let Some(user) =
            self.cache.lookup(&UserByEmailCacheKey, (email,)).await
        {
            return Ok(Some(user));
        }

        let Some(user) = self.dao.find_by_email(email).await?
        else {
            return Ok(None);
        };
        self.cache
            .populate(&UserByEmailCacheKey, (email,), &user, self.ttl.entity)
            .await;

        Ok(Some(user))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>, UserError> {
        if let Some(users) = self.cache.lookup(&UserListCacheKey, ()).await {
            return Ok(users);
        }

        let users = self.dao.all().await?;
        self.cache
            .populate(&UserListCacheKey, (), &users, self.ttl.collection)
            .await;

        Ok(users)
    }

    /// Writes through, then repopulates `user:<id>` with the stored row.
    #[instrument(skip(self, command))]
    pub async fn update(
        &self, id: i64, command: UpdateUserCommand,
    ) -> Result<(), UserError> {
        let user = self.dao.update(id, command).await?;

        self.cache
            .invalidate([
                UserCacheKey.get_key_with_args((&id,)),
                UserListCacheKey.get_key(),
            ])
            .await;
        self.cache
            .populate(&UserCacheKey, (&id,), &user, self.ttl.entity)
            .await;

        Ok(())
    }

    /// Owned events go with the user, so the event listing is dropped too.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), UserError> {
        self.dao.delete(id).await?;

        self.cache
            .invalidate([
                UserCacheKey.get_key_with_args((&id,)),
                UserListCacheKey.get_key(),
                EventListCacheKey.get_key(),
            ])
            .await;

        Ok(())
    }
}
