//! Runs one framed query and flattens its outcome for the wire.
//!
//! Execution errors, scan failures, and deadline expiry are all surfaced
//! the same way: as a [`QueryResult`] carrying the error message. Nothing
//! here touches the connection; sending is the protocol loop's job.

use sqlwire_proto::QueryResult;
use tracing::debug;

use crate::database::Database;

/// Executes `query` against `db` under the handle's deadline.
pub async fn execute(db: &Database, query: &str) -> QueryResult {
    match db.query(query).await {
        Ok(rows) => QueryResult::with_rows(rows.columns, rows.rows),
        Err(e) => {
            debug!("query failed: {e}");
            QueryResult::error(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::database::DatabaseConfig;

    fn open_temp(config: DatabaseConfig) -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("test.sqlite3"), config).unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_rows_become_data_result() {
        let (_dir, db) = open_temp(DatabaseConfig::default());
        execute(&db, "CREATE TABLE t (v TEXT)").await;
        execute(&db, "INSERT INTO t VALUES ('x'), (NULL)").await;

        let result = execute(&db, "SELECT v FROM t").await;
        assert!(!result.is_error());
        assert_eq!(result.columns, vec!["v"]);
        assert_eq!(
            result.rows,
            vec![vec!["x".to_string()], vec!["NULL".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_failure_becomes_error_result() {
        let (_dir, db) = open_temp(DatabaseConfig::default());
        let result = execute(&db, "SELECT * FROM missing").await;
        assert!(result.is_error());
        assert!(result.error.contains("missing"));
        assert!(result.columns.is_empty());
        assert!(result.rows.is_empty());
    }

    #[tokio::test]
    async fn test_deadline_becomes_error_result() {
        let (_dir, db) = open_temp(DatabaseConfig {
            query_timeout: Duration::from_millis(100),
            ..DatabaseConfig::default()
        });

        let slow = "WITH RECURSIVE c(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM c WHERE x < 500000000) SELECT count(*) FROM c";
        let result = execute(&db, slow).await;
        assert!(result.is_error());
        assert!(result.error.contains("deadline"));

        // Subsequent queries on the same handle keep working.
        let ok = execute(&db, "SELECT 1 AS one").await;
        assert!(!ok.is_error());
    }
}
