//! Bounded pool of SQLite connections.
//!
//! The pool is the system's only source of backpressure: at most
//! `max_open` connections exist at once, and a caller that cannot get one
//! blocks on the semaphore until a permit frees up. Released connections
//! are kept for reuse up to `max_idle`; any surplus is closed on release.

use std::collections::VecDeque;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::Connection;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use super::error::{DatabaseError, DatabaseResult};

/// How long a connection waits on a locked database file before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool of connections to one SQLite file.
pub(crate) struct ConnectionPool {
    path: PathBuf,
    semaphore: Arc<Semaphore>,
    idle: Mutex<VecDeque<Connection>>,
    max_idle: usize,
}

impl ConnectionPool {
    /// Creates a pool for the database at `path`.
    pub(crate) fn new(path: &Path, max_open: usize, max_idle: usize) -> Arc<Self> {
        Arc::new(Self {
            path: path.to_path_buf(),
            semaphore: Arc::new(Semaphore::new(max_open.max(1))),
            idle: Mutex::new(VecDeque::new()),
            max_idle,
        })
    }

    /// Acquires a connection, blocking until one of the `max_open` permits
    /// is available. Reuses an idle connection when possible.
    pub(crate) async fn acquire(self: &Arc<Self>) -> DatabaseResult<PooledConnection> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| DatabaseError::Closed)?;

        let reused = self.idle.lock().pop_front();
        let conn = match reused {
            Some(conn) => conn,
            None => open_connection(&self.path)?,
        };

        Ok(PooledConnection {
            pool: Arc::clone(self),
            conn: Some(conn),
            _permit: permit,
        })
    }

    /// Opens one connection eagerly and parks it idle, so path and
    /// permission problems surface at construction time.
    pub(crate) fn warm(&self) -> DatabaseResult<()> {
        let conn = open_connection(&self.path)?;
        self.idle.lock().push_back(conn);
        Ok(())
    }

    /// Closes the pool: pending and future acquisitions fail and idle
    /// connections are dropped.
    pub(crate) fn close(&self) {
        self.semaphore.close();
        self.idle.lock().clear();
    }

    /// Number of idle connections currently retained.
    pub(crate) fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }

    fn release(&self, conn: Connection) {
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push_back(conn);
        } else {
            debug!("idle limit reached, closing released connection");
        }
    }
}

fn open_connection(path: &Path) -> DatabaseResult<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

/// A connection checked out of the pool.
///
/// Dereferences to [`rusqlite::Connection`] and returns to the pool on drop,
/// releasing its permit.
pub(crate) struct PooledConnection {
    pool: Arc<ConnectionPool>,
    conn: Option<Connection>,
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("connection already released")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.release(conn);
        }
    }
}
