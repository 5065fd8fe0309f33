//! Postgres persistence for CrowdSense.
//!
//! - [`create_pool`] / [`health_check`] / [`run_migrations`] -- connection bootstrap.
//! - [`models`] -- row structs and DTOs.
//! - [`repositories`] -- zero-sized repos with async query methods.
//! - [`ingestion`] -- the transactional feedback submission workflow.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod ingestion;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Connection pool limits.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Upper bound on open connections (default: 20).
    pub max_connections: u32,
    /// How long a request waits for a free connection (default: 2s).
    pub acquire_timeout: Duration,
    /// Idle connections older than this are closed (default: 30s).
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 20,
            acquire_timeout: Duration::from_secs(2),
            idle_timeout: Duration::from_secs(30),
        }
    }
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, settings: &PoolSettings) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(settings.idle_timeout)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
