//! Database connection pool management.

use super::{DbError, SqlDialect};
use sqlx::{MySql, Pool, Sqlite};
use std::time::Duration;
use tracing::info;

/// Unified database pool over SQLite or MySQL.
#[derive(Clone)]
pub enum DbPool {
    /// SQLite connection pool (for development/testing).
    Sqlite(Pool<Sqlite>),
    /// MySQL connection pool (the published dataset).
    MySql(Pool<MySql>),
}

/// Options for creating a database connection pool.
#[derive(Debug, Clone)]
pub struct PoolOptions {
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections to maintain.
    pub min_connections: u32,
    /// Maximum time to wait for a connection.
    pub acquire_timeout: Duration,
    /// Maximum lifetime of a connection.
    pub max_lifetime: Option<Duration>,
    /// Idle timeout for connections.
    pub idle_timeout: Option<Duration>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        // Zero keeps no idle connection open between requests.
        let min_connections = std::env::var("DATABASE_MIN_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let acquire_timeout_secs = std::env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Self {
            max_connections,
            min_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            max_lifetime: Some(Duration::from_secs(1800)),
            idle_timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// Creates a database connection pool from a database URL.
///
/// The URL scheme determines the database type:
/// - `sqlite://` or `sqlite:` for SQLite
/// - `mysql://` for MySQL
pub async fn create_pool(database_url: &str) -> Result<DbPool, DbError> {
    create_pool_with_options(database_url, PoolOptions::default()).await
}

/// Creates a database connection pool with custom options.
pub async fn create_pool_with_options(
    database_url: &str,
    options: PoolOptions,
) -> Result<DbPool, DbError> {
    match SqlDialect::from_url(database_url) {
        Some(SqlDialect::Sqlite) => {
            info!("Creating SQLite connection pool");
            let pool = sqlx::sqlite::SqlitePoolOptions::new()
                .max_connections(options.max_connections)
                .min_connections(options.min_connections)
                .acquire_timeout(options.acquire_timeout)
                .max_lifetime(options.max_lifetime)
                .idle_timeout(options.idle_timeout)
                .connect(database_url)
                .await
                .map_err(connection_error)?;
            Ok(DbPool::Sqlite(pool))
        }
        Some(SqlDialect::MySql) => {
            info!("Creating MySQL connection pool");
            let pool = sqlx::mysql::MySqlPoolOptions::new()
                .max_connections(options.max_connections)
                .min_connections(options.min_connections)
                .acquire_timeout(options.acquire_timeout)
                .max_lifetime(options.max_lifetime)
                .idle_timeout(options.idle_timeout)
                .connect(database_url)
                .await
                .map_err(connection_error)?;
            Ok(DbPool::MySql(pool))
        }
        None => Err(DbError::Configuration(format!(
            "Unsupported database URL scheme. Expected sqlite: or mysql://, got: {}",
            database_url.split(':').next().unwrap_or("unknown")
        ))),
    }
}

/// Failures while establishing the pool are connectivity failures, whatever
/// the driver calls them.
fn connection_error(err: sqlx::Error) -> DbError {
    match DbError::from(err) {
        DbError::Query(msg) => DbError::Connection(msg),
        other => other,
    }
}

impl DbPool {
    /// Returns the database type as a string.
    pub fn db_type(&self) -> &'static str {
        match self {
            DbPool::Sqlite(_) => "sqlite",
            DbPool::MySql(_) => "mysql",
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        match self {
            DbPool::Sqlite(_) => SqlDialect::Sqlite,
            DbPool::MySql(_) => SqlDialect::MySql,
        }
    }

    /// Checks if the database connection is healthy.
    pub async fn is_healthy(&self) -> bool {
        match self {
            DbPool::Sqlite(pool) => sqlx::query("SELECT 1").fetch_one(pool).await.is_ok(),
            DbPool::MySql(pool) => sqlx::query("SELECT 1").fetch_one(pool).await.is_ok(),
        }
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        match self {
            DbPool::Sqlite(pool) => pool.close().await,
            DbPool::MySql(pool) => pool.close().await,
        }
    }

    /// Returns pool statistics.
    pub fn pool_size(&self) -> u32 {
        match self {
            DbPool::Sqlite(pool) => pool.size(),
            DbPool::MySql(pool) => pool.size(),
        }
    }

    /// Returns number of idle connections.
    pub fn idle_connections(&self) -> usize {
        match self {
            DbPool::Sqlite(pool) => pool.num_idle(),
            DbPool::MySql(pool) => pool.num_idle(),
        }
    }
}
