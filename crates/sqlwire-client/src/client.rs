//! Client connection management.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use sqlwire_proto::QueryResult;

use crate::error::{ClientError, ClientResult};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9999,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Creates a new client configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Returns the server address as `host:port`.
    pub fn connection_string(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// A connection to a sqlwire server.
///
/// One `Client` mirrors exactly one server-side handling routine; dropping
/// it closes the stream, which the server observes as end-of-stream.
pub struct Client {
    config: ClientConfig,
    stream: TcpStream,
}

impl Client {
    /// Connects to the server described by `config`.
    pub async fn connect(config: ClientConfig) -> ClientResult<Self> {
        let addr = config.connection_string();
        let connect = TcpStream::connect(&addr);

        let stream = match tokio::time::timeout(config.connect_timeout, connect).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(ClientError::ConnectionFailed(e)),
            Err(_) => {
                return Err(ClientError::ConnectionTimeout(
                    config.connect_timeout.as_millis() as u64,
                ))
            }
        };

        debug!(%addr, "connected");
        Ok(Self { config, stream })
    }

    /// Sends one query and decodes its result.
    ///
    /// The query's raw bytes are written as-is: the trailing `;` delimiter
    /// must already be embedded, and there is no length header. Exactly one
    /// result is then read off the stream.
    pub async fn execute(&mut self, query: &str) -> ClientResult<QueryResult> {
        self.stream.write_all(query.as_bytes()).await?;
        let result = QueryResult::decode(&mut self.stream).await?;
        Ok(result)
    }

    /// Returns the configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .finish()
    }
}
