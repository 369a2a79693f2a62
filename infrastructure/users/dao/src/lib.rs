use std::time::Duration;

use async_trait::async_trait;
use dao_utils::{QUERY_DEADLINE, with_deadline};
use database_traits::dao::GenericDao;
use sql_connection::{PgError, SqlConnect};
use tokio_postgres::{Row, error::SqlState};
use tracing::instrument;
use user_commands::{CreateUserCommand, UpdateUserCommand};
use user_errors::UserError;
use user_models::User;

const USER_COLUMNS: &str = "id, email, name, password";

/// Source-of-truth operations a user repository relies on.
#[async_trait]
pub trait UserStore:
    GenericDao<
        Model = User,
        CreateRequest = CreateUserCommand,
        UpdateRequest = UpdateUserCommand,
        Error = UserError,
        ID = i64,
    >
{
    async fn find_by_email(
        &self, email: &str,
    ) -> Result<Option<User>, UserError>;
}

#[derive(Clone)]
pub struct UserDao {
    db: SqlConnect,
    deadline: Duration,
}

impl UserDao {
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
impl GenericDao for UserDao {
    type CreateRequest = CreateUserCommand;
    type Error = UserError;
    type ID = i64;
    type Model = User;
    type UpdateRequest = UpdateUserCommand;

    #[instrument(skip(self))]
    async fn find_by_id(
        &self, id: Self::ID,
    ) -> Result<Option<Self::Model>, Self::Error> {
        with_deadline(self.deadline, async {
            let client = self.db.get_client().await?;
            let stmt = client
                .prepare(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
                ))
                .await?;
            let row = client.query_opt(&stmt, &[&id]).await?;

            Ok::<_, UserError>(row.as_ref().map(map_row))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn all(&self) -> Result<Vec<Self::Model>, Self::Error> {
        with_deadline(self.deadline, async {
            let client = self.db.get_client().await?;
            let stmt = client
                .prepare(&format!(
                    "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"
                ))
                .await?;
            let rows = client.query(&stmt, &[]).await?;

            Ok::<_, UserError>(rows.iter().map(map_row).collect())
        })
        .await
    }

    #[instrument(skip(self, req), fields(user.email = %req.email))]
    async fn create(
        &self, req: Self::CreateRequest,
    ) -> Result<Self::Model, Self::Error> {
        with_deadline(self.deadline, async {
            let client = self.db.get_client().await?;
            let stmt = client
                .prepare(&format!(
                    "INSERT INTO users (email, name, password)
                     VALUES ($1, $2, $3)
                     RETURNING {USER_COLUMNS}"
                ))
                .await?;
            let row = client
                .query_one(&stmt, &[&req.email, &req.name, &req.password])
                .await
                .map_err(map_write_error)?;

            Ok::<_, UserError>(map_row(&row))
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
                    "UPDATE users SET email = $1, name = $2
                     WHERE id = $3
                     RETURNING {USER_COLUMNS}"
                ))
                .await?;
            let row = client
                .query_opt(&stmt, &[&req.email, &req.name, &id])
                .await
                .map_err(map_write_error)?
                .ok_or(UserError::NotFound { user_id: id })?;

            Ok::<_, UserError>(map_row(&row))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Self::ID) -> Result<(), Self::Error> {
        with_deadline(self.deadline, async {
            let client = self.db.get_client().await?;
            let stmt =
                client.prepare("DELETE FROM users WHERE id = $1").await?;
            let rows = client.execute(&stmt, &[&id]).await?;

            if rows == 0 {
                return Err(UserError::NotFound { user_id: id });
            }

            Ok::<_, UserError>(())
        })
        .await
    }
}

#[async_trait]
impl UserStore for UserDao {
    #[instrument(skip(self))]
    async fn find_by_email(
        &self, email: &str,
    ) -> Result<Option<User>, UserError> {
        with_deadline(self.deadline, async {
            let client = self.db.get_client().await?;
            let stmt = client
                .prepare(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
                ))
                .await?;
            let row = client.query_opt(&stmt, &[&email]).await?;

            Ok::<_, UserError>(row.as_ref().map(map_row))
        })
        .await
    }
}

fn map_row(row: &Row) -> User {
    User {
        id: row.get(0),
        email: row.get(1),
        name: row.get(2),
        password: row.get(3),
    }
}

fn map_write_error(err: PgError) -> UserError {
    if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        UserError::EmailExists
    }
    else {
        UserError::Database(err)
    }
}
