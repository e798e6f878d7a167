//! sqlwire server daemon.
//!
//! The `sqlwired` binary opens the configured SQLite database and serves it
//! over a raw TCP socket, one concurrent task per client connection.
//!
//! # Usage
//!
//! ```bash
//! # Serve db.sqlite3 on the default port
//! sqlwired
//!
//! # Serve a specific database on a custom port
//! sqlwired --db /var/lib/app.sqlite3 --port 9998
//!
//! # Use a configuration file
//! sqlwired --config /etc/sqlwire/sqlwired.toml
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sqlwire_server::config::ServerConfig;
use sqlwire_server::database::Database;
use sqlwire_server::net::Server;

/// sqlwire server daemon
#[derive(Parser, Debug)]
#[command(
    name = "sqlwired",
    version,
    about = "Serve a SQLite database over a raw TCP socket"
)]
struct Args {
    /// Host address to bind to
    #[arg(short = 'H', long, env = "SQLWIRE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long, env = "SQLWIRE_PORT")]
    port: Option<u16>,

    /// The database file to open and serve
    #[arg(short = 'd', long = "db", value_name = "FILE", env = "SQLWIRE_DB")]
    db_path: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", env = "SQLWIRE_LOG_LEVEL")]
    log_level: String,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let config = load_config(&args)?;

    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    run_server(config).await
}

fn init_logging(args: &Args) {
    let level = if args.verbose { "debug" } else { &args.log_level };

    let filter = EnvFilter::try_new(format!("sqlwire_server={level},sqlwire_proto={level}"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> Result<ServerConfig> {
    let mut config = if let Some(path) = &args.config {
        ServerConfig::from_file(path).context("failed to load config file")?
    } else {
        ServerConfig::default()
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(path) = &args.db_path {
        config.db_path = path.clone();
    }

    Ok(config)
}

async fn run_server(config: ServerConfig) -> Result<()> {
    info!("sqlwired v{}", env!("CARGO_PKG_VERSION"));
    info!("  database: {}", config.db_path.display());
    info!("  listen address: {}", config.socket_addr());
    info!(
        "  pool: {} open / {} idle, query deadline {}s",
        config.max_open_connections, config.max_idle_connections, config.query_timeout_secs
    );

    let db = Database::open(&config.db_path, config.database_config())
        .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
    let db = Arc::new(db);

    let addr: SocketAddr = config
        .socket_addr()
        .parse()
        .context("invalid listen address")?;

    let server = Server::new(Arc::clone(&db), addr);

    info!("press Ctrl+C to shut down");
    tokio::select! {
        result = server.serve() => {
            if let Err(e) = result {
                error!("server error: {e}");
                return Err(e.into());
            }
        }
        _ = shutdown_signal() => {
            info!("shutdown signal received");
        }
    }

    db.close();
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
