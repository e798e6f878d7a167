//! Server configuration.
//!
//! Loaded from a TOML file and overridden by command-line flags in the
//! `sqlwired` binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::database::DatabaseConfig;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the SQLite database file to open and serve.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Maximum number of concurrently open database connections.
    #[serde(default = "default_max_open_connections")]
    pub max_open_connections: usize,

    /// Maximum number of idle database connections kept for reuse.
    #[serde(default = "default_max_idle_connections")]
    pub max_idle_connections: usize,

    /// Per-query execution deadline in seconds.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9999
}

fn default_db_path() -> PathBuf {
    PathBuf::from("db.sqlite3")
}

fn default_max_open_connections() -> usize {
    20
}

fn default_max_idle_connections() -> usize {
    5
}

fn default_query_timeout() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            max_open_connections: default_max_open_connections(),
            max_idle_connections: default_max_idle_connections(),
            query_timeout_secs: default_query_timeout(),
        }
    }
}

impl ServerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Converts configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Returns the listen address as `host:port`.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Derives the database tuning knobs from this configuration.
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            max_open_connections: self.max_open_connections,
            max_idle_connections: self.max_idle_connections,
            query_timeout: Duration::from_secs(self.query_timeout_secs),
        }
    }

    /// Creates a builder for configuration.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::new()
    }
}

/// Builder for server configuration.
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets the database file path.
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Sets the maximum number of open database connections.
    pub fn max_open_connections(mut self, max: usize) -> Self {
        self.config.max_open_connections = max;
        self
    }

    /// Sets the maximum number of idle database connections.
    pub fn max_idle_connections(mut self, max: usize) -> Self {
        self.config.max_idle_connections = max;
        self
    }

    /// Sets the query deadline in seconds.
    pub fn query_timeout_secs(mut self, secs: u64) -> Self {
        self.config.query_timeout_secs = secs;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> ServerConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9999);
        assert_eq!(config.max_open_connections, 20);
        assert_eq!(config.max_idle_connections, 5);
        assert_eq!(config.query_timeout_secs, 5);
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::builder()
            .host("localhost")
            .port(9998)
            .db_path("/tmp/app.sqlite3")
            .query_timeout_secs(2)
            .build();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 9998);
        assert_eq!(config.db_path, PathBuf::from("/tmp/app.sqlite3"));
        assert_eq!(config.query_timeout_secs, 2);
    }

    #[test]
    fn test_database_config_mapping() {
        let config = ServerConfig::builder().query_timeout_secs(7).build();
        let db = config.database_config();
        assert_eq!(db.max_open_connections, 20);
        assert_eq!(db.max_idle_connections, 5);
        assert_eq!(db.query_timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sqlwired.toml");

        let config = ServerConfig::builder().host("testhost").port(1234).build();
        config.save(&path).unwrap();

        let loaded = ServerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.host, "testhost");
        assert_eq!(loaded.port, 1234);
        assert_eq!(loaded.max_open_connections, 20);
    }
}
