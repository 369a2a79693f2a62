use dao_utils::DeadlineExceeded;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Database error: {0}")]
    Database(#[from] sql_connection::PgError),
    #[error("Connection error: {0}")]
    Connection(#[from] sql_connection::PoolError),
    #[error("Event not found: {event_id}")]
    NotFound { event_id: i64 },
    #[error("Owner not found: {owner_id}")]
    OwnerNotFound { owner_id: i64 },
    #[error("Timeout: {0}")]
    Timeout(#[from] DeadlineExceeded),
}

impl EventError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EventError::NotFound { .. })
    }
}
