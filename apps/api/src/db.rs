use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Connects the cvforge pool and brings the schema up to date. Migrations
/// are embedded at compile time from `migrations/`, so a fresh database
/// needs no out-of-band setup step.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to PostgreSQL")?;
    info!("cvforge database pool ready ({max_connections} connections)");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to apply database migrations")?;
    info!("database schema up to date");

    Ok(pool)
}
