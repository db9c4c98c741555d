//! SQLite ledger implementation.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Row};
use tokio_rusqlite::Connection;
use tracing::debug;
use uuid::Uuid;

use crate::criteria::{ExecutionCriteria, FilterClause, Page, Pageable};
use crate::error::LedgerError;
use crate::record::{ExecutionRecord, ExecutionStatus, NewExecution};
use crate::schema::init_schema;
use crate::store::ExecutionLedger;

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;

const COLUMNS: &str = "id, external_id, job_name, url, status, response_time, error_message, created_date, trace_id";

/// SQLite-backed execution ledger.
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    /// Create a new in-memory database.
    pub async fn in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        conn.call(|conn| Ok(init_schema(conn)?)).await?;

        Ok(Self { conn })
    }

    /// Open or create a file-backed database, creating parent directories.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| LedgerError::Connection(e.to_string()))?;
            }
        }

        debug!("Opening execution ledger at {:?}", path);
        let conn = Connection::open(path)
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        conn.call(|conn| Ok(init_schema(conn)?)).await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl ExecutionLedger for SqliteLedger {
    async fn append(&self, execution: NewExecution) -> Result<ExecutionRecord, LedgerError> {
        let external_id = Uuid::new_v4();
        let created_date = Utc::now();
        let created_nanos = to_nanos(&created_date);
        let response_time = i64::try_from(execution.response_time).unwrap_or(i64::MAX);

        let row = execution.clone();
        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO job_execution
                     (external_id, job_name, url, status, response_time, error_message, created_date, trace_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        external_id.to_string(),
                        row.job_name,
                        row.url,
                        row.status.as_str(),
                        response_time,
                        row.error_message,
                        created_nanos,
                        row.trace_id,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        Ok(execution.into_record(id, external_id, from_nanos(created_nanos)))
    }

    async fn count(&self, criteria: &ExecutionCriteria) -> Result<u64, LedgerError> {
        let (where_sql, binds) = where_clause(criteria);
        let sql = format!("SELECT COUNT(*) FROM job_execution{}", where_sql);

        let total = self
            .conn
            .call(move |conn| {
                let total: i64 =
                    conn.query_row(&sql, params_from_iter(binds.iter()), |row| row.get(0))?;
                Ok(total)
            })
            .await?;

        Ok(total.max(0) as u64)
    }

    async fn find(
        &self,
        criteria: &ExecutionCriteria,
        pageable: &Pageable,
    ) -> Result<Page<ExecutionRecord>, LedgerError> {
        let (where_sql, binds) = where_clause(criteria);
        let count_sql = format!("SELECT COUNT(*) FROM job_execution{}", where_sql);
        let page_sql = format!(
            "SELECT {} FROM job_execution{}{} LIMIT ? OFFSET ?",
            COLUMNS,
            where_sql,
            pageable.sort.sql()
        );

        let mut page_binds = binds.clone();
        page_binds.push(Value::Integer(i64::from(pageable.page_size)));
        page_binds.push(Value::Integer(
            i64::try_from(pageable.offset()).unwrap_or(i64::MAX),
        ));

        // Count and page read from the same snapshot.
        let (total, content) = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let total: i64 =
                    tx.query_row(&count_sql, params_from_iter(binds.iter()), |row| row.get(0))?;

                let content = {
                    let mut stmt = tx.prepare(&page_sql)?;
                    let rows = stmt.query_map(params_from_iter(page_binds.iter()), row_to_record)?;
                    rows.collect::<Result<Vec<_>, _>>()?
                };

                tx.commit()?;
                Ok((total, content))
            })
            .await?;

        Ok(Page::new(content, pageable, total.max(0) as u64))
    }
}

/// Build the `WHERE` clause and its positional bind values.
fn where_clause(criteria: &ExecutionCriteria) -> (String, Vec<Value>) {
    let clauses = criteria.clauses();
    if clauses.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut sql = String::from(" WHERE ");
    let fragments: Vec<&str> = clauses.iter().map(|c| c.sql()).collect();
    sql.push_str(&fragments.join(" AND "));

    let binds = clauses.iter().map(bind_value).collect();
    (sql, binds)
}

fn bind_value(clause: &FilterClause) -> Value {
    match clause {
        FilterClause::JobName(s) | FilterClause::Url(s) => Value::Text(s.clone()),
        FilterClause::Status(status) => Value::Text(status.as_str().to_string()),
        FilterClause::CreatedFrom(at) | FilterClause::CreatedTo(at) => {
            Value::Integer(to_nanos(at))
        }
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ExecutionRecord> {
    let external_id: String = row.get(1)?;
    let external_id = Uuid::parse_str(&external_id)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    let status: String = row.get(4)?;
    let status: ExecutionStatus = status
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    let response_time: i64 = row.get(5)?;
    let response_time = u64::try_from(response_time)
        .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(5, response_time))?;

    let created_nanos: i64 = row.get(7)?;

    Ok(ExecutionRecord {
        id: row.get(0)?,
        external_id,
        job_name: row.get(2)?,
        url: row.get(3)?,
        status,
        response_time,
        error_message: row.get(6)?,
        created_date: from_nanos(created_nanos),
        trace_id: row.get(8)?,
    })
}

/// Timestamps are stored as nanoseconds since the epoch so range bounds
/// compare exactly. Instants outside the representable range saturate
/// toward the side they fall on.
fn to_nanos(at: &DateTime<Utc>) -> i64 {
    at.timestamp_nanos_opt().unwrap_or(if at.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}

fn from_nanos(nanos: i64) -> DateTime<Utc> {
    let secs = nanos.div_euclid(1_000_000_000);
    let sub = nanos.rem_euclid(1_000_000_000) as u32;
    DateTime::from_timestamp(secs, sub).unwrap_or_default()
}
