//! Database layer for the NEO Tracker.
//!
//! SQLx-backed data access for the asteroid dataset, with SQLite for
//! development and tests and MySQL for the production dataset.

mod error;
mod executor;
pub mod import;
pub mod mocks;
mod pool;
mod schema;
mod statement;

pub use error::DbError;
pub use executor::{create_query_executor, MySqlQueryExecutor, QueryExecutor, SqliteQueryExecutor};
pub use import::{import_csv, insert_records, read_approaches, read_asteroids, ImportSummary};
pub use pool::{create_pool, create_pool_with_options, DbPool, PoolOptions};
pub use schema::run_migrations;
pub use statement::{BindValue, SqlDialect, Statement};
