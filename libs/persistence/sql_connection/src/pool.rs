use std::time::Duration;

use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::{DbConnectConfig, DbOptionsConfig},
    impl_get_connect::SqlConnect,
};

/// Pre-warms a connection pool by creating connections up front
async fn prewarm_pool(pool: &Pool, count: u32) {
    debug!("Pre-warming pool with {} connections", count);
    let mut handles = vec![];

    for i in 0..count {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            if let Err(e) = pool.get().await {
                warn!("Failed to pre-warm connection {}: {}", i + 1, e);
            }
        }));
    }

    for handle in handles {
        let _ = handle.await;
    }

    info!(
        "Pool pre-warming complete: {} connections available",
        pool.status().available
    );
}

pub fn build_pool(uri: &str, max_conn: Option<u32>) -> anyhow::Result<Pool> {
    let pg_config = uri.parse::<tokio_postgres::Config>()?;

    let mgr_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(pg_config, NoTls, mgr_config);

    let mut pool_builder = Pool::builder(mgr)
        .runtime(deadpool_postgres::Runtime::Tokio1) // Required for timeout support
        .wait_timeout(Some(Duration::from_millis(2000)))
        .create_timeout(Some(Duration::from_millis(5000)))
        .recycle_timeout(Some(Duration::from_millis(100)));

    if let Some(max_conn) = max_conn {
        pool_builder = pool_builder.max_size(max_conn as usize);
    }

    Ok(pool_builder.build()?)
}

#[instrument(skip_all, name = "connect-pgsql")]
pub async fn connect_postgres_db<C>(config: &C) -> anyhow::Result<SqlConnect>
where
    C: DbConnectConfig + DbOptionsConfig,
{
    info!(
        postgres.max_conn = ?config.max_conn(),
        postgres.min_conn = ?config.min_conn()
    );

    let pool = build_pool(config.uri(), config.max_conn())?;

    if let Some(min_conn) = config.min_conn() {
        prewarm_pool(&pool, min_conn).await;
    }

    Ok(SqlConnect::new(pool))
}
