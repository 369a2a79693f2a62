use dao_utils::DeadlineExceeded;
use sql_connection::{PgError, PoolError as DbPoolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {user_id}")]
    NotFound { user_id: i64 },
    #[error("Email already exists")]
    EmailExists,
    #[error("Database error: {0}")]
    Database(#[from] PgError),
    #[error("Database Pool error: {0}")]
    DatabasePool(#[from] DbPoolError),
    #[error("Timeout: {0}")]
    Timeout(#[from] DeadlineExceeded),
}

impl UserError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserError::NotFound { .. })
    }
}
