//! # sqlwire-client
//!
//! Client library for the sqlwire protocol.
//!
//! A [`Client`] owns one TCP connection and drives a strictly sequential
//! request/response loop: write the raw bytes of one `;`-terminated query,
//! then decode exactly one [`QueryResult`]. There is no pipelining: at
//! most one query is ever in flight.
//!
//! # Example
//!
//! ```no_run
//! use sqlwire_client::{Client, ClientConfig};
//!
//! # async fn example() -> Result<(), sqlwire_client::ClientError> {
//! let mut client = Client::connect(ClientConfig::new().host("localhost").port(9999)).await?;
//! let result = client.execute("SELECT 1;").await?;
//! if result.is_error() {
//!     eprintln!("{}", result.error);
//! } else {
//!     println!("{} rows", result.row_count());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod error;

pub use client::{Client, ClientConfig};
pub use error::{ClientError, ClientResult};
pub use sqlwire_proto::QueryResult;
