//! # sqlwire-proto
//!
//! Wire protocol definitions shared by the sqlwire server and client.
//!
//! This crate provides:
//!
//! - **`QueryResult`**: the single data-transfer entity crossing the wire:
//!   column names, row data, or an error string.
//! - **Codec**: the byte-exact serialization of a `QueryResult`, used for
//!   every server→client response.
//! - **`DELIMITER`**: the character that terminates a client query in the
//!   request direction.
//!
//! # Example
//!
//! ```
//! use sqlwire_proto::QueryResult;
//!
//! let result = QueryResult::with_rows(
//!     vec!["id".to_string(), "name".to_string()],
//!     vec![vec!["1".to_string(), "Alice".to_string()]],
//! );
//! let bytes = result.encode();
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let decoded = QueryResult::decode(&mut &bytes[..]).await.unwrap();
//! assert_eq!(decoded, result);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod result;

pub use codec::WireError;
pub use result::QueryResult;

/// The character that marks the end of a client query on the wire.
///
/// Requests carry no length prefix: the client writes the raw query bytes
/// and the server reads until it sees this byte. A delimiter inside a quoted
/// SQL string literal still ends the frame; this is a documented limitation
/// of the protocol, not something either peer attempts to compensate for.
pub const DELIMITER: u8 = b';';
