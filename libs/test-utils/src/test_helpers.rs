use chrono::NaiveDate;
use events_commands::CreateEventCommand;
use sql_connection::SqlConnect;
use tracing_subscriber::EnvFilter;
use user_commands::CreateUserCommand;

use crate::postgres::TestPostgresContainer;

pub fn create_sql_connect(container: &TestPostgresContainer) -> SqlConnect {
    SqlConnect::new(container.pool.clone())
}

/// Installs a test-friendly subscriber once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

pub fn create_user_command(email: &str) -> CreateUserCommand {
    CreateUserCommand {
        email: email.to_string(),
        name: "Test User".to_string(),
        password: "$argon2id$test-hash".to_string(),
    }
}

pub fn create_event_command(owner_id: i64, name: &str) -> CreateEventCommand {
    CreateEventCommand {
        owner_id,
        name: name.to_string(),
        description: format!("{name} description"),
        date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default(),
        location: "Berlin".to_string(),
    }
}
