//! Database schema management.

use rusqlite::Connection;
use tokio_rusqlite::Error;

/// Initialize the database schema.
pub fn init_schema(conn: &Connection) -> Result<(), Error> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
-- One row per probe, never updated
CREATE TABLE IF NOT EXISTS job_execution (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id TEXT NOT NULL UNIQUE,
    job_name TEXT NOT NULL,
    url TEXT NOT NULL,
    status TEXT NOT NULL,
    response_time INTEGER NOT NULL,
    error_message TEXT,
    created_date INTEGER NOT NULL,
    trace_id TEXT
);

CREATE INDEX IF NOT EXISTS idx_job_execution_job_name ON job_execution(job_name);
CREATE INDEX IF NOT EXISTS idx_job_execution_status ON job_execution(status);
CREATE INDEX IF NOT EXISTS idx_job_execution_created ON job_execution(created_date);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'job_execution'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
