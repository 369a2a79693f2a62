use std::time::Duration;

use anyhow::{Context, Result};
use deadpool_postgres::Pool;
use testcontainers_modules::{
    postgres::Postgres,
    testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
};
use tokio::time::sleep;

use crate::SCHEMA_SQL;

/// Throwaway PostgreSQL instance with the users/events schema applied.
pub struct TestPostgresContainer {
    pub pool: Pool,
    pub connection_string: String,
    // Keep the container alive for the lifetime of this struct
    _container: ContainerAsync<Postgres>,
}

impl TestPostgresContainer {
    pub async fn new() -> Result<Self> {
        let container = Postgres::default()
            .with_env_var("POSTGRES_DB", "testdb")
            .with_env_var("POSTGRES_USER", "testuser")
            .with_env_var("POSTGRES_PASSWORD", "testpass")
            .start()
            .await
            .context("Failed to start PostgreSQL container")?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let connection_string = format!(
            "postgresql://testuser:testpass@{host}:{port}/testdb"
        );

        let pool = sql_connection::build_pool(&connection_string, Some(10))?;
        Self::wait_until_ready(&pool).await?;

        let instance = Self {
            pool,
            connection_string,
            _container: container,
        };
        instance.apply_schema().await?;

        Ok(instance)
    }

    async fn wait_until_ready(pool: &Pool) -> Result<()> {
        const MAX_ATTEMPTS: u32 = 20;

        let mut attempts = 0;
        loop {
            let ready = match pool.get().await {
                Ok(client) => client.query_one("SELECT 1", &[]).await.is_ok(),
                Err(_) => false,
            };
            if ready {
                return Ok(());
            }
            attempts += 1;
            if attempts >= MAX_ATTEMPTS {
                anyhow::bail!(
                    "PostgreSQL not ready after {MAX_ATTEMPTS} attempts"
                );
            }
            sleep(Duration::from_millis(500)).await;
        }
    }

    pub async fn execute_sql(&self, sql: &str) -> Result<()> {
        let client = self.pool.get().await?;
        client
            .batch_execute(sql)
            .await
            .context("Failed to execute SQL")?;
        Ok(())
    }

    async fn apply_schema(&self) -> Result<()> {
        self.execute_sql(SCHEMA_SQL)
            .await
            .context("Failed to apply schema")
    }
}
