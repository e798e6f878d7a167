//! # sqlwire-server
//!
//! Network server for sqlwire.
//!
//! This crate provides:
//!
//! - **Database handle**: a shared [`database::Database`] wrapping a local
//!   SQLite file behind a bounded connection pool. Every query runs under a
//!   deadline and its rows are collapsed to strings at the boundary.
//!
//! - **Query executor**: turns one query's outcome (rows, column names, or
//!   an error) into the wire [`sqlwire_proto::QueryResult`].
//!
//! - **Connection protocol**: the per-connection loop that frames
//!   `;`-delimited queries off the TCP stream, executes them, and writes
//!   each encoded result back.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use sqlwire_server::database::{Database, DatabaseConfig};
//! use sqlwire_server::net::Server;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let db = Database::open("db.sqlite3", DatabaseConfig::default())?;
//! let server = Server::new(Arc::new(db), "0.0.0.0:9999".parse()?);
//! server.serve().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Server configuration.
pub mod config;

/// SQLite database handle, connection pool, and value conversion.
pub mod database;

/// Query execution under a deadline.
pub mod executor;

/// TCP listener and per-connection protocol loop.
pub mod net;

pub use config::ServerConfig;
pub use database::{Database, DatabaseConfig, DatabaseError};
pub use net::Server;
