use std::time::Duration;

use async_trait::async_trait;
use dao_utils::{QUERY_DEADLINE, with_deadline};
use database_traits::dao::GenericDao;
use events_commands::{CreateEventCommand, UpdateEventCommand};
use events_errors::EventError;
use events_models::Event;
use sql_connection::{PgError, SqlConnect};
use tokio_postgres::{Row, error::SqlState};
use tracing::instrument;

const EVENT_COLUMNS: &str = "id, owner_id, name, description, date, location";

/// Source-of-truth operations an event repository relies on.
#[async_trait]
pub trait EventStore:
    GenericDao<
        Model = Event,
        CreateRequest = CreateEventCommand,
        UpdateRequest = UpdateEventCommand,
        Error = EventError,
        ID = i64,
    >
{
    /// Events owned by `owner_id`, earliest date first.
    async fn find_by_owner(
        &self, owner_id: i64,
    ) -> Result<Vec<Event>, EventError>;
}

#[derive(Clone)]
pub struct EventDao {
    db: SqlConnect,
    deadline: Duration,
}

impl EventDao {
    pub fn new(db: SqlConnect) -> Self {
        Self {
            db,
            deadline: QUERY_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

#[async_trait]
impl GenericDao for EventDao {
    type CreateRequest = CreateEventCommand;
    type Error = EventError;
    type ID = i64;
    type Model = Event;
    type UpdateRequest = UpdateEventCommand;

    #[instrument(skip(self))]
    async fn find_by_id(
        &self, id: Self::ID,
    ) -> Result<Option<Self::Model>, Self::Error> {
        with_deadline(self.deadline, async {
            let client = self.db.get_client().await?;
            let stmt = client
                .prepare(&format!(
                    "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
                ))
                .await?;
            let row = client.query_opt(&stmt, &[&id]).await?;

            Ok::<_, EventError>(row.as_ref().map(map_row))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn all(&self) -> Result<Vec<Self::Model>, Self::Error> {
        with_deadline(self.deadline, async {
            let client = self.db.get_client().await?;
            let stmt = client
                .prepare(&format!(
                    "SELECT {EVENT_COLUMNS} FROM events ORDER BY id ASC"
                ))
                .await?;
            let rows = client.query(&stmt, &[]).await?;

            Ok::<_, EventError>(rows.iter().map(map_row).collect())
        })
        .await
    }

    #[instrument(skip(self, req), fields(event.owner_id = req.owner_id))]
    async fn create(
        &self, req: Self::CreateRequest,
    ) -> Result<Self::Model, Self::Error> {
        let owner_id = req.owner_id;
        with_deadline(self.deadline, async {
            let client = self.db.get_client().await?;
            let stmt = client
                .prepare(&format!(
                    "INSERT INTO events
                         (owner_id, name, description, date, location)
                     VALUES ($1, $2, $3, $4, $5)
                     RETURNING {EVENT_COLUMNS}"
                ))
                .await?;
            let row = client
                .query_one(&stmt, &[
                    &req.owner_id,
                    &req.name,
                    &req.description,
                    &req.date,
                    &req.location,
                ])
                .await
                .map_err(|err| map_owner_error(err, owner_id))?;

            Ok::<_, EventError>(map_row(&row))
        })
        .await
    }

    #[instrument(skip(self, req))]
    async fn update(
        &self, id: Self::ID, req: Self::UpdateRequest,
    ) -> Result<Self::Model, Self::Error> {
        with_deadline(self.deadline, async {
            let client = self.db.get_client().await?;
            let stmt = client
                .prepare(&format!(
                    "UPDATE events
                     SET name = $1, description = $2, date = $3, location = $4
                     WHERE id = $5
                     RETURNING {EVENT_COLUMNS}"
                ))
                .await?;
            let row = client
                .query_opt(&stmt, &[
                    &req.name,
                    &req.description,
                    &req.date,
                    &req.location,
                    &id,
                ])
                .await?
                .ok_or(EventError::NotFound { event_id: id })?;

            Ok::<_, EventError>(map_row(&row))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Self::ID) -> Result<(), Self::Error> {
        with_deadline(self.deadline, async {
            let client = self.db.get_client().await?;
            let stmt =
                client.prepare("DELETE FROM events WHERE id = $1").await?;
            let rows = client.execute(&stmt, &[&id]).await?;

            if rows == 0 {
                return Err(EventError::NotFound { event_id: id });
            }

            Ok::<_, EventError>(())
        })
        .await
    }
}

#[async_trait]
impl EventStore for EventDao {
    #[instrument(skip(self))]
    async fn find_by_owner(
        &self, owner_id: i64,
    ) -> Result<Vec<Event>, EventError> {
        with_deadline(self.deadline, async {
            let client = self.db.get_client().await?;
            let stmt = client
                .prepare(&format!(
                    "SELECT {EVENT_COLUMNS} FROM events
                     WHERE owner_id = $1
                     ORDER BY date ASC, id ASC"
                ))
                .await?;
            let rows = client.query(&stmt, &[&owner_id]).await?;

            Ok::<_, EventError>(rows.iter().map(map_row).collect())
        })
        .await
    }
}

fn map_row(row: &Row) -> Event {
    Event {
        id: row.get(0),
        owner_id: row.get(1),
        name: row.get(2),
        description: row.get(3),
        date: row.get(4),
        location: row.get(5),
    }
}

fn map_owner_error(err: PgError, owner_id: i64) -> EventError {
    if err.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) {
        EventError::OwnerNotFound { owner_id }
    }
    else {
        EventError::Database(err)
    }
}
