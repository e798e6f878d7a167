//! Interactive prompt session.
//!
//! Drives the line editor, the query composer, and the client's
//! request/response loop: compose one query, send it, decode one result,
//! render or report, repeat until an exit directive.

use std::path::PathBuf;

use anyhow::Result;
use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::{debug, error};

use sqlwire_client::Client;

use crate::composer::{Composed, QueryComposer};
use crate::formatter::{self, OutputFormat};

/// The prompt shown when waiting for a new query.
const PROMPT: &str = "sqlwire> ";

/// The continuation prompt for multi-line input.
const CONTINUATION_PROMPT: &str = "     -> ";

/// Interactive session over one server connection.
pub struct Repl {
    client: Client,
    editor: Editor<(), DefaultHistory>,
    format: OutputFormat,
    history_file: Option<PathBuf>,
}

impl Repl {
    /// Creates a REPL around an already connected client.
    pub fn new(client: Client, format: OutputFormat) -> Result<Self> {
        let rl_config = Config::builder()
            .history_ignore_space(true)
            .max_history_size(1000)?
            .build();

        let mut editor: Editor<(), DefaultHistory> = Editor::with_config(rl_config)?;

        let history_file = get_history_file();
        if let Some(ref path) = history_file {
            if path.exists() {
                let _ = editor.load_history(path);
            }
        }

        Ok(Self {
            client,
            editor,
            format,
            history_file,
        })
    }

    /// Prints the welcome banner.
    pub fn print_banner(&self) {
        println!("sqlwire v{}", env!("CARGO_PKG_VERSION"));
        println!(
            "Connected to {}. Terminate queries with ';'; type \"exit\" or \"q\" to quit.\n",
            self.client.config().connection_string()
        );
    }

    /// Runs the session loop until the user exits or input ends.
    pub async fn run(&mut self) -> Result<()> {
        let mut composer = QueryComposer::new();

        loop {
            let prompt = if composer.is_composing() {
                CONTINUATION_PROMPT
            } else {
                PROMPT
            };

            match self.editor.readline(prompt) {
                Ok(line) => match composer.push_line(&line) {
                    Composed::Incomplete => continue,
                    Composed::Exit => break,
                    Composed::Query(query) => {
                        let _ = self.editor.add_history_entry(&query);
                        self.execute_and_print(&query).await;
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    composer.reset();
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    error!("readline error: {e}");
                    break;
                }
            }
        }

        self.save_history();
        println!("Goodbye!");
        Ok(())
    }

    /// Sends one query and prints its outcome.
    ///
    /// Transport and decode failures are reported and the session keeps
    /// going: if the connection is truly gone, the next send fails the
    /// same way and the user exits manually.
    pub async fn execute_and_print(&mut self, query: &str) {
        match self.client.execute(query).await {
            Err(e) => eprintln!("{e}"),
            Ok(result) if result.is_error() => eprintln!("{}", result.error),
            Ok(result) => {
                println!("{}", formatter::format_result(&result, self.format));
                if self.format == OutputFormat::Table {
                    println!(
                        "({} row{})",
                        result.row_count(),
                        if result.row_count() == 1 { "" } else { "s" }
                    );
                }
            }
        }
    }

    fn save_history(&mut self) {
        if let Some(ref path) = self.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            if let Err(e) = self.editor.save_history(path) {
                debug!("failed to save history: {e}");
            }
        }
    }
}

/// Gets the per-user history file path.
fn get_history_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("sqlwire").join("history"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_history_file() {
        let path = get_history_file();
        assert!(path.is_some());
        assert!(path.unwrap().ends_with("history"));
    }
}
