use deadpool_postgres::{Object, Pool, PoolError};

/// Handle to the relational store. Clones share the same pool.
#[derive(Debug, Clone)]
pub struct SqlConnect {
    pool: Pool,
}

impl SqlConnect {
    pub fn new(pool: Pool) -> Self { Self { pool } }

    pub async fn get_client(&self) -> Result<Object, PoolError> {
        self.pool.get().await
    }

    /// (available, size) of the underlying pool
    pub fn get_pool_status(&self) -> (usize, usize) {
        let status = self.pool.status();
        (status.available, status.size)
    }

    pub fn close(&self) { self.pool.close() }
}
