//! In-memory sources of truth with call counters, so tests can observe
//! whether a repository went to the database or was served from cache.

use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use dao_utils::{DeadlineExceeded, QUERY_DEADLINE};
use database_traits::dao::GenericDao;
use events_commands::{CreateEventCommand, UpdateEventCommand};
use events_dao::EventStore;
use events_errors::EventError;
use events_models::Event;
use tokio::sync::Mutex;
use user_commands::{CreateUserCommand, UpdateUserCommand};
use user_dao::UserStore;
use user_errors::UserError;
use user_models::User;

#[derive(Debug)]
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[derive(Debug, Default)]
struct Calls {
    reads: AtomicUsize,
    list_reads: AtomicUsize,
    writes: AtomicUsize,
    unavailable: AtomicBool,
}

impl Calls {
    fn read(&self) { self.reads.fetch_add(1, Ordering::SeqCst); }

    fn list_read(&self) { self.list_reads.fetch_add(1, Ordering::SeqCst); }

    fn write(&self) { self.writes.fetch_add(1, Ordering::SeqCst); }

    fn check(&self) -> Result<(), DeadlineExceeded> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(DeadlineExceeded(QUERY_DEADLINE))
        }
        else {
            Ok(())
        }
    }
}

/// Shared-state user table. Clones observe the same rows and counters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDao {
    table: Arc<Mutex<Table<User>>>,
    calls: Arc<Calls>,
}

impl InMemoryUserDao {
    pub fn new() -> Self { Self::default() }

    /// Single-row lookups served (`find_by_id`, `find_by_email`).
    pub fn reads(&self) -> usize { self.calls.reads.load(Ordering::SeqCst) }

    pub fn list_reads(&self) -> usize {
        self.calls.list_reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize { self.calls.writes.load(Ordering::SeqCst) }

    /// When set, every call fails as if the deadline had elapsed.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.calls.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Writes a row directly, as another process sharing the database would.
    pub async fn put(&self, user: User) {
        let mut table = self.table.lock().await;
        table.next_id = table.next_id.max(user.id + 1);
        table.rows.insert(user.id, user);
    }
}

#[async_trait]
impl GenericDao for InMemoryUserDao {
    type CreateRequest = CreateUserCommand;
    type Error = UserError;
    type ID = i64;
    type Model = User;
    type UpdateRequest = UpdateUserCommand;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, UserError> {
        self.calls.check()?;
        self.calls.read();
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<User>, UserError> {
        self.calls.check()?;
        self.calls.list_read();
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn create(&self, req: CreateUserCommand) -> Result<User, UserError> {
        self.calls.check()?;
        self.calls.write();
        let mut table = self.table.lock().await;
        if table.rows.values().any(|user| user.email == req.email) {
            return Err(UserError::EmailExists);
        }
        let user = User {
            id: table.allocate_id(),
            email: req.email,
            name: req.name,
            password: req.password,
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(
        &self, id: i64, req: UpdateUserCommand,
    ) -> Result<User, UserError> {
        self.calls.check()?;
        self.calls.write();
        let mut table = self.table.lock().await;
        if table
            .rows
            .values()
            .any(|user| user.email == req.email && user.id != id)
        {
            return Err(UserError::EmailExists);
        }
        let user = table
            .rows
            .get_mut(&id)
            .ok_or(UserError::NotFound { user_id: id })?;
        user.email = req.email;
        user.name = req.name;
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), UserError> {
        self.calls.check()?;
        self.calls.write();
        self.table
            .lock()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(UserError::NotFound { user_id: id })
    }
}

#[async_trait]
impl UserStore for InMemoryUserDao {
    async fn find_by_email(
        &self, email: &str,
    ) -> Result<Option<User>, UserError> {
        self.calls.check()?;
        self.calls.read();
        let table = self.table.lock().await;
        Ok(table.rows.values().find(|user| user.email == email).cloned())
    }
}

/// Shared-state event table. Clones observe the same rows and counters.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventDao {
    table: Arc<Mutex<Table<Event>>>,
    calls: Arc<Calls>,
}

impl InMemoryEventDao {
    pub fn new() -> Self { Self::default() }

    /// Single-row lookups served (`find_by_id`).
    pub fn reads(&self) -> usize { self.calls.reads.load(Ordering::SeqCst) }

    /// Collection queries served (`all`, `find_by_owner`).
    pub fn list_reads(&self) -> usize {
        self.calls.list_reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize { self.calls.writes.load(Ordering::SeqCst) }

    /// When set, every call fails as if the deadline had elapsed.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.calls.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Writes a row directly, as another process sharing the database would.
    pub async fn put(&self, event: Event) {
        let mut table = self.table.lock().await;
        table.next_id = table.next_id.max(event.id + 1);
        table.rows.insert(event.id, event);
    }
}

#[async_trait]
impl GenericDao for InMemoryEventDao {
    type CreateRequest = CreateEventCommand;
    type Error = EventError;
    type ID = i64;
    type Model = Event;
    type UpdateRequest = UpdateEventCommand;

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, EventError> {
        self.calls.check()?;
        self.calls.read();
        Ok(self.table.lock().await.rows.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<Event>, EventError> {
        self.calls.check()?;
        self.calls.list_read();
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn create(
        &self, req: CreateEventCommand,
    ) -> Result<Event, EventError> {
        self.calls.check()?;
        self.calls.write();
        let mut table = self.table.lock().await;
        let event = Event {
            id: table.allocate_id(),
            owner_id: req.owner_id,
            name: req.name,
            description: req.description,
            date: req.date,
            location: req.location,
        };
        table.rows.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(
        &self, id: i64, req: UpdateEventCommand,
    ) -> Result<Event, EventError> {
        self.calls.check()?;
        self.calls.write();
        let mut table = self.table.lock().await;
        let event = table
            .rows
            .get_mut(&id)
            .ok_or(EventError::NotFound { event_id: id })?;
        event.name = req.name;
        event.description = req.description;
        event.date = req.date;
        event.location = req.location;
        Ok(event.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), EventError> {
        self.calls.check()?;
        self.calls.write();
        self.table
            .lock()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(EventError::NotFound { event_id: id })
    }
}

#[async_trait]
impl EventStore for InMemoryEventDao {
    async fn find_by_owner(
        &self, owner_id: i64,
    ) -> Result<Vec<Event>, EventError> {
        self.calls.check()?;
        self.calls.list_read();
        let table = self.table.lock().await;
        let mut owned: Vec<Event> = table
            .rows
            .values()
            .filter(|event| event.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|event| (event.date, event.id));
        Ok(owned)
    }
}
