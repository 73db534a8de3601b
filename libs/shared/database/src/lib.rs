use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, error, info};

use shared_config::AppConfig;
use shared_models::error::AppError;

/// State shared by the Identity Service cells.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, pool: SqlitePool) -> Arc<Self> {
        Arc::new(Self { config, pool })
    }
}

/// Open a SQLite pool, creating the database file when it does not exist yet.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database url: {}", database_url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    info!("Connected to database {}", database_url);
    Ok(pool)
}

/// Single-connection in-memory pool. Every connection to `sqlite::memory:` is a
/// separate database, so the one connection must never be recycled.
pub async fn create_memory_pool() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("Failed to open in-memory database")?;

    Ok(pool)
}

/// Apply idempotent schema statements (`CREATE ... IF NOT EXISTS`).
pub async fn apply_schema(pool: &SqlitePool, statements: &[&str]) -> Result<()> {
    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to apply schema statement: {}", statement))?;
    }

    debug!("Applied {} schema statements", statements.len());
    Ok(())
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Map a storage failure to an internal error, logging the details.
pub fn db_error(err: sqlx::Error) -> AppError {
    error!("Database error: {}", err);
    AppError::Database(err.to_string())
}
