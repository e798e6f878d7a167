//! sqlwire command-line client.
//!
//! An interactive SQL prompt speaking the sqlwire protocol.
//!
//! # Usage
//!
//! ```bash
//! # Start the interactive prompt
//! sqlwire -H localhost -p 9999
//!
//! # Execute a single query and exit
//! sqlwire -c "SELECT * FROM users"
//!
//! # Output as JSON
//! sqlwire -o json -c "SELECT * FROM users"
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

mod composer;
mod config;
mod formatter;
mod repl;

use config::CliConfig;
use formatter::OutputFormat;
use repl::Repl;
use sqlwire_client::{Client, ClientConfig};

/// sqlwire command-line client
#[derive(Parser, Debug)]
#[command(
    name = "sqlwire",
    version,
    about = "Interactive SQL prompt for a sqlwire server"
)]
struct Args {
    /// Server hostname
    #[arg(short = 'H', long, env = "SQLWIRE_HOST")]
    host: Option<String>,

    /// Server port
    #[arg(short = 'p', long, env = "SQLWIRE_PORT")]
    port: Option<u16>,

    /// Execute a single query and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "table")]
    output: OutputFormatArg,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Suppress the banner (for scripting)
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Output format argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    /// Display results in a formatted table
    Table,
    /// Display results as JSON
    Json,
    /// Display results as CSV
    Csv,
    /// Display raw tab-separated values
    Raw,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Table => OutputFormat::Table,
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Csv => OutputFormat::Csv,
            OutputFormatArg::Raw => OutputFormat::Raw,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    let config = load_config(&args)?;
    let client = connect(&config).await?;

    if let Some(command) = &args.command {
        execute_command(client, command, args.output.into()).await
    } else {
        run_repl(client, args.output.into(), args.quiet).await
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("sqlwire_cli=debug,sqlwire_client=debug")
    } else {
        EnvFilter::new("sqlwire_cli=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn load_config(args: &Args) -> Result<CliConfig> {
    let mut config = if let Some(path) = &args.config {
        CliConfig::from_file(path)?
    } else {
        CliConfig::load_default()?
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    Ok(config)
}

async fn connect(config: &CliConfig) -> Result<Client> {
    let client_config = ClientConfig::new().host(&config.host).port(config.port);
    Client::connect(client_config)
        .await
        .with_context(|| format!("unable to reach sqlwire server at {}", config.server_addr()))
}

async fn execute_command(client: Client, sql: &str, format: OutputFormat) -> Result<()> {
    // One-shot mode bypasses the composer; make sure the delimiter the
    // wire protocol frames on is present.
    let mut query = sql.trim().to_string();
    if !query.ends_with(';') {
        query.push(';');
    }

    let mut repl = Repl::new(client, format)?;
    repl.execute_and_print(&query).await;
    Ok(())
}

async fn run_repl(client: Client, format: OutputFormat, quiet: bool) -> Result<()> {
    let mut repl = Repl::new(client, format)?;

    if !quiet {
        repl.print_banner();
    }

    repl.run().await
}
