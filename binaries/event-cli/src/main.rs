mod cli;
mod commands;
mod config;

use clap::Parser;
use models_registry::Models;
use sql_connection::connect_postgres_db;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{cli::Cli, config::AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(uri) = cli.database_url.clone() {
        config.postgres.uri = uri;
    }

    let db = connect_postgres_db(&config.postgres).await?;
    info!("PostgreSQL connection pool initialized");

    let models = if cli.no_cache {
        info!("cache disabled by flag");
        Models::direct(db.clone(), config.ttl)
    }
    else {
        Models::connect(db.clone(), &config.redis, config.ttl).await
    };

    let result = commands::run(&models, cli.command).await;

    models.close();
    db.close();

    let output = result.inspect_err(|err| error!(error = %err, "command failed"))?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
