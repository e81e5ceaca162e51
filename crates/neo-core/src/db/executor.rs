//! Statement execution: run one statement, get a table back.

use super::{BindValue, DbError, DbPool, SqlDialect, Statement};
use crate::table::{CellValue, ResultTable};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, MySql, Row, Sqlite, TypeInfo, ValueRef};
use tracing::debug;

/// The data access capability the catalog and filter depend on.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Dialect used to pick dialect-specific report SQL.
    fn dialect(&self) -> SqlDialect;

    /// Executes one read-only statement and returns every row.
    async fn fetch_table(&self, statement: &Statement) -> Result<ResultTable, DbError>;
}

/// SQLite implementation of QueryExecutor.
pub struct SqliteQueryExecutor {
    pool: sqlx::SqlitePool,
}

impl SqliteQueryExecutor {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

fn bind_sqlite<'q>(query: SqliteQuery<'q>, value: &BindValue) -> SqliteQuery<'q> {
    match value {
        BindValue::Bool(v) => query.bind(*v),
        BindValue::Int(v) => query.bind(*v),
        BindValue::Float(v) => query.bind(*v),
        BindValue::Date(v) => query.bind(*v),
        BindValue::Text(v) => query.bind(v.clone()),
    }
}

#[async_trait]
impl QueryExecutor for SqliteQueryExecutor {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    async fn fetch_table(&self, statement: &Statement) -> Result<ResultTable, DbError> {
        debug!(
            dialect = "sqlite",
            params = statement.params().len(),
            "Executing statement"
        );

        let query = statement
            .params()
            .iter()
            .fold(sqlx::query(statement.sql()), bind_sqlite);
        let rows: Vec<SqliteRow> = query.fetch_all(&self.pool).await?;

        let mut table = ResultTable::new(column_names(rows.first()));
        for row in &rows {
            table.push_row(decode_sqlite_row(row)?);
        }
        Ok(table)
    }
}

/// Decodes by the runtime storage class of each value.
fn decode_sqlite_row(row: &SqliteRow) -> Result<Vec<CellValue>, DbError> {
    let mut cells = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            cells.push(CellValue::Null);
            continue;
        }
        let type_name = raw.type_info().name().to_ascii_uppercase();
        let cell = match type_name.as_str() {
            "INTEGER" | "INT8" | "BIGINT" | "BOOLEAN" => CellValue::Int(row.try_get::<i64, _>(index)?),
            "REAL" => CellValue::Float(row.try_get::<f64, _>(index)?),
            "TEXT" | "DATE" => {
                let text: String = row.try_get(index)?;
                match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
                    Ok(date) => CellValue::Date(date),
                    Err(_) => CellValue::Text(text),
                }
            }
            _ => {
                let bytes: Vec<u8> = row.try_get_unchecked(index)?;
                CellValue::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
        };
        cells.push(cell);
    }
    Ok(cells)
}

/// MySQL implementation of QueryExecutor.
pub struct MySqlQueryExecutor {
    pool: sqlx::MySqlPool,
}

impl MySqlQueryExecutor {
    pub fn new(pool: sqlx::MySqlPool) -> Self {
        Self { pool }
    }
}

type MySqlQuery<'q> = sqlx::query::Query<'q, MySql, MySqlArguments>;

fn bind_mysql<'q>(query: MySqlQuery<'q>, value: &BindValue) -> MySqlQuery<'q> {
    match value {
        BindValue::Bool(v) => query.bind(*v),
        BindValue::Int(v) => query.bind(*v),
        BindValue::Float(v) => query.bind(*v),
        BindValue::Date(v) => query.bind(*v),
        BindValue::Text(v) => query.bind(v.clone()),
    }
}

#[async_trait]
impl QueryExecutor for MySqlQueryExecutor {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::MySql
    }

    async fn fetch_table(&self, statement: &Statement) -> Result<ResultTable, DbError> {
        debug!(
            dialect = "mysql",
            params = statement.params().len(),
            "Executing statement"
        );

        let query = statement
            .params()
            .iter()
            .fold(sqlx::query(statement.sql()), bind_mysql);
        let rows: Vec<MySqlRow> = query.fetch_all(&self.pool).await?;

        let mut table = ResultTable::new(column_names(rows.first()));
        for row in &rows {
            table.push_row(decode_mysql_row(row)?);
        }
        Ok(table)
    }
}

/// Decodes by declared column type. DECIMAL arrives as text on the wire
/// (`AVG` over integers, for example) and is read as a float.
fn decode_mysql_row(row: &MySqlRow) -> Result<Vec<CellValue>, DbError> {
    let mut cells = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        let raw = row.try_get_raw(index)?;
        if raw.is_null() {
            cells.push(CellValue::Null);
            continue;
        }
        let type_name = raw.type_info().name().to_ascii_uppercase();
        let cell = match type_name.as_str() {
            "BOOLEAN" => CellValue::Bool(row.try_get::<bool, _>(index)?),
            name if name.contains("INT") && name.ends_with("UNSIGNED") => {
                let value: u64 = row.try_get(index)?;
                i64::try_from(value)
                    .map(CellValue::Int)
                    .unwrap_or(CellValue::Float(value as f64))
            }
            name if name.contains("INT") => CellValue::Int(row.try_get::<i64, _>(index)?),
            "FLOAT" | "DOUBLE" => CellValue::Float(row.try_get::<f64, _>(index)?),
            "DECIMAL" => {
                let text: String = row.try_get_unchecked(index)?;
                text.parse::<f64>()
                    .map(CellValue::Float)
                    .unwrap_or(CellValue::Text(text))
            }
            "DATE" => CellValue::Date(row.try_get::<NaiveDate, _>(index)?),
            "DATETIME" | "TIMESTAMP" => {
                let value: NaiveDateTime = row.try_get(index)?;
                CellValue::Text(value.format("%Y-%m-%d %H:%M:%S").to_string())
            }
            _ => CellValue::Text(row.try_get_unchecked::<String, _>(index)?),
        };
        cells.push(cell);
    }
    Ok(cells)
}

/// Column names come from the first row; an empty result has none.
fn column_names<R: Row>(row: Option<&R>) -> Vec<String> {
    row.map(|r| r.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default()
}

/// Factory function to create the appropriate executor based on pool type.
pub fn create_query_executor(pool: &DbPool) -> Box<dyn QueryExecutor> {
    match pool {
        DbPool::Sqlite(pool) => Box::new(SqliteQueryExecutor::new(pool.clone())),
        DbPool::MySql(pool) => Box::new(MySqlQueryExecutor::new(pool.clone())),
    }
}
