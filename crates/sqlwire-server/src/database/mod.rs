//! SQLite database handle.
//!
//! One [`Database`] is constructed at startup and handed (behind an `Arc`)
//! to every connection task. It owns the connection pool whose bounds are
//! the only admission control in the system; the protocol layer performs no
//! locking of its own.

mod error;
mod pool;
mod value;

pub use error::{DatabaseError, DatabaseResult};
pub use value::{Field, RowBuilder, NULL_LITERAL};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use pool::{ConnectionPool, PooledConnection};

/// Tuning knobs for the database handle.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Maximum number of concurrently open SQLite connections.
    pub max_open_connections: usize,
    /// Maximum number of released connections kept for reuse.
    pub max_idle_connections: usize,
    /// Per-query execution deadline.
    pub query_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_open_connections: 20,
            max_idle_connections: 5,
            query_timeout: Duration::from_secs(5),
        }
    }
}

/// Columns and stringified rows produced by one successful query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    /// Column names in statement order.
    pub columns: Vec<String>,
    /// Rows in result order; each row has exactly `columns.len()` cells.
    pub rows: Vec<Vec<String>>,
}

/// Handle to a local SQLite database file.
pub struct Database {
    pool: Arc<ConnectionPool>,
    config: DatabaseConfig,
}

impl Database {
    /// Opens (creating if necessary) the database at `path`.
    ///
    /// One connection is opened eagerly so path and permission problems
    /// surface here instead of on the first query.
    pub fn open(path: impl AsRef<Path>, config: DatabaseConfig) -> DatabaseResult<Self> {
        let pool = ConnectionPool::new(
            path.as_ref(),
            config.max_open_connections,
            config.max_idle_connections,
        );
        pool.warm()?;
        Ok(Self { pool, config })
    }

    /// Runs one query under the configured deadline.
    pub async fn query(&self, sql: &str) -> DatabaseResult<RowSet> {
        self.query_with_deadline(sql, self.config.query_timeout)
            .await
    }

    /// Runs one query, aborting it if it does not complete within
    /// `deadline`.
    ///
    /// The statement executes on the blocking thread pool; on expiry it is
    /// interrupted so the underlying connection frees up promptly and the
    /// caller gets [`DatabaseError::DeadlineExceeded`].
    pub async fn query_with_deadline(
        &self,
        sql: &str,
        deadline: Duration,
    ) -> DatabaseResult<RowSet> {
        let conn = self.pool.acquire().await?;
        let interrupt = conn.get_interrupt_handle();

        let sql = sql.to_string();
        let task = tokio::task::spawn_blocking(move || run_statement(conn, &sql));

        match tokio::time::timeout(deadline, task).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_err)) => Err(DatabaseError::Internal(join_err.to_string())),
            Err(_) => {
                debug!("interrupting statement past its deadline");
                interrupt.interrupt();
                Err(DatabaseError::DeadlineExceeded(deadline))
            }
        }
    }

    /// Closes the handle; in-flight statements finish but no new
    /// connections can be acquired.
    pub fn close(&self) {
        self.pool.close();
    }

    /// Number of idle pooled connections (for logging and tests).
    pub fn idle_connections(&self) -> usize {
        self.pool.idle_count()
    }

    /// The per-query deadline this handle enforces.
    pub fn query_timeout(&self) -> Duration {
        self.config.query_timeout
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("max_open", &self.config.max_open_connections)
            .field("max_idle", &self.config.max_idle_connections)
            .field("query_timeout", &self.config.query_timeout)
            .finish()
    }
}

fn run_statement(conn: PooledConnection, sql: &str) -> DatabaseResult<RowSet> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut raw_rows = stmt.query([])?;
    while let Some(row) = raw_rows.next()? {
        let mut builder = RowBuilder::new(width);
        for idx in 0..width {
            builder.push(Field::from_sql(row.get_ref(idx)?));
        }
        rows.push(builder.finish()?);
    }

    Ok(RowSet { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp(config: DatabaseConfig) -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("test.sqlite3"), config).unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_create_insert_select() {
        let (_dir, db) = open_temp(DatabaseConfig::default());

        db.query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")
            .await
            .unwrap();
        db.query("INSERT INTO users (name) VALUES ('Alice'), ('Bob')")
            .await
            .unwrap();

        let result = db.query("SELECT id, name FROM users ORDER BY id").await.unwrap();
        assert_eq!(result.columns, vec!["id", "name"]);
        assert_eq!(
            result.rows,
            vec![
                vec!["1".to_string(), "Alice".to_string()],
                vec!["2".to_string(), "Bob".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_null_becomes_literal() {
        let (_dir, db) = open_temp(DatabaseConfig::default());

        db.query("CREATE TABLE t (a TEXT, b INTEGER)").await.unwrap();
        db.query("INSERT INTO t VALUES (NULL, 7)").await.unwrap();

        let result = db.query("SELECT a, b FROM t").await.unwrap();
        assert_eq!(result.rows, vec![vec!["NULL".to_string(), "7".to_string()]]);
    }

    #[tokio::test]
    async fn test_bad_sql_is_an_error() {
        let (_dir, db) = open_temp(DatabaseConfig::default());
        let err = db.query("SELEC 1").await.unwrap_err();
        assert!(matches!(err, DatabaseError::Sqlite(_)));
    }

    #[tokio::test]
    async fn test_deadline_exceeded_then_reusable() {
        let (_dir, db) = open_temp(DatabaseConfig {
            query_timeout: Duration::from_millis(100),
            ..DatabaseConfig::default()
        });

        // A CPU-bound recursive scan that cannot finish inside 100ms.
        let slow = "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 500000000) SELECT count(*) FROM c";
        let err = db.query(slow).await.unwrap_err();
        assert!(matches!(err, DatabaseError::DeadlineExceeded(_)));
        assert!(err.to_string().contains("deadline"));

        // The handle keeps serving queries afterwards.
        let result = db.query("SELECT 1 AS one").await.unwrap();
        assert_eq!(result.rows, vec![vec!["1".to_string()]]);
    }

    #[tokio::test]
    async fn test_closed_handle_rejects_queries() {
        let (_dir, db) = open_temp(DatabaseConfig::default());
        db.close();
        assert!(matches!(
            db.query("SELECT 1").await,
            Err(DatabaseError::Closed)
        ));
    }
}
