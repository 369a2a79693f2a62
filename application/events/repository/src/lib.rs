use events_cache_keys::{EventCacheKey, EventListCacheKey};
use events_commands::{CreateEventCommand, UpdateEventCommand};
use events_dao::{EventDao, EventStore};
use events_errors::EventError;
use events_models::Event;
use redis_connection::{CacheAside, CacheKey, CacheTtl};
use tracing::instrument;
use user_cache_keys::UserCacheKey;

/// Cache-aside access to events.
#[derive(Clone)]
pub struct EventRepository<D = EventDao> {
    dao: D,
    cache: CacheAside,
    ttl: CacheTtl,
}

impl<D> EventRepository<D>
where
    D: EventStore,
{
    pub fn new(dao: D, cache: CacheAside, ttl: CacheTtl) -> Self {
        Self { dao, cache, ttl }
    }

    pub fn dao(&self) -> &D { &self.dao }

    pub fn cache(&self) -> &CacheAside { &self.cache }

    /// Drops the event listing and the owner's cached record.
    #[instrument(skip(self, command), fields(event.owner_id = command.owner_id))]
    pub async fn create(
        &self, command: CreateEventCommand,
    ) -> Result<Event, EventError> {
        let event = self.dao.create(command).await?;

        self.cache
            .invalidate([
                EventListCacheKey.get_key(),
                UserCacheKey.get_key_with_args((&event.owner_id,)),
            ])
            .await;

        Ok(event)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<Event>, EventError> {
        if let Some(event) = self.cache.lookup(&EventCacheKey, (&id,)).await {
            return Ok(Some(event));
        }

        let Some(event) = self.dao.find_by_id(id).await?
        else {
            return Ok(None);
        };
        self.cache
            .populate(&EventCacheKey, (&id,), &event, self.ttl.entity)
            .await;

        Ok(Some(event))
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Event>, EventError> {
        if let Some(events) = self.cache.lookup(&EventListCacheKey, ()).await
        {
            return Ok(events);
        }

        let events = self.dao.all().await?;
        self.cache
            .populate(&EventListCacheKey, (), &events, self.ttl.collection)
            .await;

        Ok(events)
    }

    /// Always answered by the source of truth.
    #[instrument(skip(self))]
    pub async fn list_by_owner(
        &self, owner_id: i64,
    ) -> Result<Vec<Event>, EventError> {
        self.dao.find_by_owner(owner_id).await
    }

    /// Writes through, then repopulates `event:<id>` with the stored row.
    #[instrument(skip(self, command))]
    pub async fn update(
        &self, id: i64, command: UpdateEventCommand,
    ) -> Result<(), EventError> {
        let event = self.dao.update(id, command).await?;

        self.cache
            .invalidate([
                EventCacheKey.get_key_with_args((&id,)),
                EventListCacheKey.get_key(),
            ])
            .await;
        self.cache
            .populate(&EventCacheKey, (&id,), &event, self.ttl.entity)
            .await;

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), EventError> {
        self.dao.delete(id).await?;

        self.cache
            .invalidate([
                EventCacheKey.get_key_with_args((&id,)),
                EventListCacheKey.get_key(),
            ])
            .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use redis_connection::CacheStore;
    use test_utils::{
        InMemoryEventDao, create_event_command, memory_store,
        unreachable_cache,
    };
    use user_models::User;

    use super::*;

    type TestRepository = EventRepository<InMemoryEventDao>;

    const OWNER: i64 = 1;

    fn repository(cache: CacheAside) -> (InMemoryEventDao, TestRepository) {
        let dao = InMemoryEventDao::new();
        let repo =
            EventRepository::new(dao.clone(), cache, CacheTtl::default());
        (dao, repo)
    }

    fn cached(store: &CacheStore) -> (InMemoryEventDao, TestRepository) {
        repository(CacheAside::enabled(store.clone()))
    }

    async fn create_launch(repo: &TestRepository) -> Event {
        repo.create(create_event_command(OWNER, "Launch"))
            .await
            .unwrap()
    }

    fn renamed(event: &Event, name: &str) -> UpdateEventCommand {
        UpdateEventCommand {
            name: name.to_string(),
            description: event.description.clone(),
            date: event.date,
            location: event.location.clone(),
        }
    }

    async fn is_absent(store: &CacheStore, key: &str) -> bool {
        store.get::<Event>(key).await.unwrap_err().is_not_found()
    }

    #[tokio::test]
    async fn test_launch_scenario() {
        let store = memory_store();
        let (dao, repo) = cached(&store);
        let launch = create_launch(&repo).await;
        let key = format!("event:{}", launch.id);
        let ttl = CacheTtl::default().collection;
        store.set("events:list", &vec![launch.clone()], ttl).await.unwrap();

        assert!(is_absent(&store, &key).await);
        assert_eq!(repo.get(launch.id).await.unwrap(), Some(launch.clone()));
        assert_eq!(dao.reads(), 1);
        assert_eq!(store.get::<Event>(&key).await.unwrap(), launch);

        repo.update(launch.id, renamed(&launch, "Launch Party"))
            .await
            .unwrap();
        assert_eq!(store.get::<Event>(&key).await.unwrap().name, "Launch Party");
        let list = store.get::<Vec<Event>>("events:list").await.unwrap_err();
        assert!(list.is_not_found());

        let fetched = repo.get(launch.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Launch Party");
        assert_eq!(dao.reads(), 1);
    }

    #[tokio::test]
    async fn test_create_drops_owner_record() {
        let store = memory_store();
        let (_dao, repo) = cached(&store);
        let owner = User {
            id: OWNER,
            email: "owner@example.com".to_string(),
            name: "Owner".to_string(),
            password: "hash".to_string(),
        };
        let ttl = CacheTtl::default().entity;
        store.set("user:1", &owner, ttl).await.unwrap();

        create_launch(&repo).await;

        let err = store.get::<User>("user:1").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_writes_invalidate_event_list() {
        let store = memory_store();
        let (dao, repo) = cached(&store);
        let launch = create_launch(&repo).await;

        assert_eq!(repo.list().await.unwrap(), vec![launch.clone()]);
        assert_eq!(repo.list().await.unwrap(), vec![launch.clone()]);
        assert_eq!(dao.list_reads(), 1);

        let meetup = repo
            .create(create_event_command(OWNER, "Meetup"))
            .await
            .unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 2);
        assert_eq!(dao.list_reads(), 2);

        repo.update(meetup.id, renamed(&meetup, "Big Meetup"))
            .await
            .unwrap();
        let listed = repo.list().await.unwrap();
        assert!(listed.iter().any(|event| event.name == "Big Meetup"));
        assert_eq!(dao.list_reads(), 3);

        repo.delete(launch.id).await.unwrap();
        let remaining = repo.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, meetup.id);
        assert_eq!(dao.list_reads(), 4);
    }

    #[tokio::test]
    async fn test_hit_masks_external_change_until_invalidated() {
        let store = memory_store();
        let (dao, repo) = cached(&store);
        let launch = create_launch(&repo).await;
        repo.get(launch.id).await.unwrap();

        dao.put(Event {
            location: "Paris".to_string(),
            ..launch.clone()
        })
        .await;
        let cached_event = repo.get(launch.id).await.unwrap().unwrap();
        assert_eq!(cached_event.location, "Berlin");

        repo.delete(launch.id).await.unwrap();
        assert_eq!(repo.get(launch.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_event_is_not_cached() {
        let store = memory_store();
        let (dao, repo) = cached(&store);

        assert_eq!(repo.get(7).await.unwrap(), None);
        assert_eq!(repo.get(7).await.unwrap(), None);

        assert_eq!(dao.reads(), 2);
        assert!(is_absent(&store, "event:7").await);
    }

    #[tokio::test]
    async fn test_update_of_missing_event_caches_nothing() {
        let store = memory_store();
        let (_dao, repo) = cached(&store);

        let result = repo
            .update(7, UpdateEventCommand {
                name: "Ghost".to_string(),
                description: String::new(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                location: String::new(),
            })
            .await;

        assert!(matches!(result, Err(EventError::NotFound { event_id: 7 })));
        assert!(is_absent(&store, "event:7").await);
    }

    #[tokio::test]
    async fn test_delete_twice_converges() {
        let store = memory_store();
        let (_dao, repo) = cached(&store);
        let launch = create_launch(&repo).await;
        repo.get(launch.id).await.unwrap();

        repo.delete(launch.id).await.unwrap();
        let second = repo.delete(launch.id).await;

        assert!(second.unwrap_err().is_not_found());
        assert!(is_absent(&store, &format!("event:{}", launch.id)).await);
    }

    #[tokio::test]
    async fn test_list_by_owner_is_never_cached() {
        let store = memory_store();
        let (dao, repo) = cached(&store);
        let launch = create_launch(&repo).await;
        repo.create(create_event_command(OWNER + 1, "Other"))
            .await
            .unwrap();

        assert_eq!(repo.list_by_owner(OWNER).await.unwrap(), vec![
            launch.clone()
        ]);
        assert_eq!(repo.list_by_owner(OWNER).await.unwrap(), vec![launch]);

        assert_eq!(dao.list_reads(), 2);
    }

    #[tokio::test]
    async fn test_unreachable_cache_falls_back_to_source() {
        let (dao, repo) = repository(unreachable_cache());

        let launch = create_launch(&repo).await;
        assert_eq!(repo.get(launch.id).await.unwrap(), Some(launch.clone()));
        assert_eq!(repo.list().await.unwrap(), vec![launch.clone()]);
        repo.update(launch.id, renamed(&launch, "Launch Party"))
            .await
            .unwrap();
        let fetched = repo.get(launch.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Launch Party");
        repo.delete(launch.id).await.unwrap();
        assert_eq!(repo.get(launch.id).await.unwrap(), None);

        assert_eq!(dao.reads(), 3);
    }

    #[tokio::test]
    async fn test_direct_mode_always_reads_source() {
        let (dao, repo) = repository(CacheAside::disabled());
        let launch = create_launch(&repo).await;

        repo.get(launch.id).await.unwrap();
        repo.get(launch.id).await.unwrap();

        assert_eq!(dao.reads(), 2);
        assert!(!repo.cache().is_enabled());
    }
}
