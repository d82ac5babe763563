//! SQLite database connection pool management.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to create pool: {0}")]
    PoolCreationFailed(#[source] sqlx::Error),
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),
    #[error("Schema bootstrap failed: {0}")]
    SchemaBootstrapFailed(#[source] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(3),
        }
    }
}

pub async fn create_pool(
    database_url: &str,
    config: Option<PoolConfig>,
) -> Result<SqlitePool, ConnectionError> {
    let config = config.unwrap_or_default();

    let connect_options = SqliteConnectOptions::from_str(database_url)
        .map_err(|_| ConnectionError::InvalidDatabaseUrl(database_url.to_string()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(connect_options)
        .await
        .map_err(ConnectionError::PoolCreationFailed)?;

    bootstrap_schema(&pool).await?;
    Ok(pool)
}

/// In-memory pool for tests.
pub async fn create_test_pool() -> Result<SqlitePool, ConnectionError> {
    let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|_| ConnectionError::InvalidDatabaseUrl("sqlite::memory:".to_string()))?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .shared_cache(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await
        .map_err(ConnectionError::PoolCreationFailed)?;

    bootstrap_schema(&pool).await?;
    Ok(pool)
}

/// Create the event and trace tables if they do not exist yet.
async fn bootstrap_schema(pool: &SqlitePool) -> Result<(), ConnectionError> {
    sqlx::query(
        r"CREATE TABLE IF NOT EXISTS interaction_events (
            id TEXT PRIMARY KEY,
            agent_id TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            content TEXT NOT NULL,
            topic TEXT,
            task_complete INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(pool)
    .await
    .map_err(ConnectionError::SchemaBootstrapFailed)?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_events_agent_ts
         ON interaction_events (agent_id, timestamp)",
    )
    .execute(pool)
    .await
    .map_err(ConnectionError::SchemaBootstrapFailed)?;

    sqlx::query(
        r"CREATE TABLE IF NOT EXISTS execution_traces (
            id TEXT PRIMARY KEY,
            agent_id TEXT NOT NULL,
            benchmark_score REAL NOT NULL,
            benchmark_passed INTEGER NOT NULL,
            is_high_quality INTEGER NOT NULL,
            patch TEXT,
            task_log TEXT NOT NULL,
            tool_uses TEXT NOT NULL,
            evolving_requirements TEXT,
            completed_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(ConnectionError::SchemaBootstrapFailed)?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_traces_agent_completed
         ON execution_traces (agent_id, completed_at)",
    )
    .execute(pool)
    .await
    .map_err(ConnectionError::SchemaBootstrapFailed)?;

    Ok(())
}
