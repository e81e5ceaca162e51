//! Mock implementation of QueryExecutor for testing.
//!
//! Records every statement it receives and answers with a canned table, so
//! callers can assert on the exact SQL and bound parameters without a database.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::{DbError, QueryExecutor, SqlDialect, Statement};
use crate::table::ResultTable;

/// Canned outcome for the next statements.
#[derive(Debug, Clone)]
enum MockResponse {
    Table(ResultTable),
    ConnectionFailure(String),
}

/// Mock QueryExecutor backed by in-memory state.
pub struct MockQueryExecutor {
    dialect: SqlDialect,
    response: Arc<RwLock<MockResponse>>,
    statements: Arc<RwLock<Vec<Statement>>>,
}

impl Default for MockQueryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockQueryExecutor {
    /// Creates a mock that answers every statement with an empty table.
    pub fn new() -> Self {
        Self::with_table(ResultTable::default())
    }

    /// Creates a mock that answers every statement with `table`.
    pub fn with_table(table: ResultTable) -> Self {
        Self {
            dialect: SqlDialect::Sqlite,
            response: Arc::new(RwLock::new(MockResponse::Table(table))),
            statements: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Creates a mock whose every call fails as if the database were unreachable.
    pub fn unreachable(message: &str) -> Self {
        Self {
            dialect: SqlDialect::Sqlite,
            response: Arc::new(RwLock::new(MockResponse::ConnectionFailure(
                message.to_string(),
            ))),
            statements: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Reports the given dialect instead of SQLite.
    pub fn with_dialect(mut self, dialect: SqlDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Replaces the canned table.
    pub async fn set_table(&self, table: ResultTable) {
        *self.response.write().await = MockResponse::Table(table);
    }

    /// Statements received so far, oldest first.
    pub async fn statements(&self) -> Vec<Statement> {
        self.statements.read().await.clone()
    }

    /// The most recent statement, if any.
    pub async fn last_statement(&self) -> Option<Statement> {
        self.statements.read().await.last().cloned()
    }
}

#[async_trait]
impl QueryExecutor for MockQueryExecutor {
    fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    async fn fetch_table(&self, statement: &Statement) -> Result<ResultTable, DbError> {
        self.statements.write().await.push(statement.clone());
        match &*self.response.read().await {
            MockResponse::Table(table) => Ok(table.clone()),
            MockResponse::ConnectionFailure(msg) => Err(DbError::Connection(msg.clone())),
        }
    }
}
