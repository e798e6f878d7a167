//! Error types for the client library.

use thiserror::Error;

use sqlwire_proto::WireError;

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Establishing the TCP connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(std::io::Error),

    /// The connection attempt did not complete in time.
    #[error("connection timeout after {0}ms")]
    ConnectionTimeout(u64),

    /// Sending a query failed.
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// The response could not be decoded off the stream.
    #[error("{0}")]
    Decode(#[from] WireError),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
