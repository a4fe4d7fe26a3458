//! PostgreSQL pool, migrations and liveness query

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Name reported in `pg_stat_activity`
const APPLICATION_NAME: &str = "bmi-tracker";

/// Open the pool described by the `[database]` section
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)
        .context("Invalid database URL")?
        .application_name(APPLICATION_NAME);

    let pool = pool_options(config)
        .connect_with(connect_options)
        .await
        .context("Failed to connect to the database")?;

    info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database pool ready"
    );

    Ok(pool)
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
}

/// Apply pending schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Round-trip a trivial query
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        warn!(error = %e, "Database health check failed");
        e
    })?;
    Ok(())
}
