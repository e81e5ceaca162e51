//! Database schema and migrations.

use super::{DbError, DbPool};
use tracing::info;

/// Runs database migrations.
///
/// Tables are created with `IF NOT EXISTS`, so pointing the tracker at an
/// already-populated dataset leaves the data untouched.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    match pool {
        DbPool::Sqlite(pool) => {
            info!("Running SQLite migrations");
            sqlx::migrate!("src/db/migrations/sqlite").run(pool).await?;
        }
        DbPool::MySql(pool) => {
            info!("Running MySQL migrations");
            sqlx::migrate!("src/db/migrations/mysql").run(pool).await?;
        }
    }

    info!("Migrations completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_create_both_tables() {
        let url = format!(
            "sqlite:file:schema_{}?mode=memory&cache=shared",
            uuid::Uuid::new_v4()
        );
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .unwrap();
        let db = DbPool::Sqlite(pool.clone());

        run_migrations(&db).await.unwrap();
        // Second run is a no-op
        run_migrations(&db).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('asteroids', 'close_approach') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["asteroids", "close_approach"]);
    }
}
