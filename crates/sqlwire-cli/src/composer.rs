//! Multi-line query composition.
//!
//! The composer accumulates interactively entered lines into one
//! `;`-terminated query. It is a pure state machine so the framing rules
//! can be tested without a terminal; the REPL feeds it one line at a time.

/// Outcome of feeding one line into the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composed {
    /// No complete query yet; keep prompting for continuation lines.
    Incomplete,
    /// A complete query: buffered lines joined with single spaces, the
    /// trailing delimiter included.
    Query(String),
    /// The user asked to leave the session. Nothing is sent to the server.
    Exit,
}

/// Accumulates prompt lines until a query is terminated.
#[derive(Debug, Default)]
pub struct QueryComposer {
    lines: Vec<String>,
}

impl QueryComposer {
    /// Creates an empty composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one raw input line.
    ///
    /// Blank lines are ignored. The exact strings `exit` and `q` (after
    /// trimming) yield [`Composed::Exit`] even mid-composition. Any other
    /// line is buffered; the query completes once a line ends with `;`.
    pub fn push_line(&mut self, line: &str) -> Composed {
        let line = line.trim();
        if line.is_empty() {
            return Composed::Incomplete;
        }
        if line == "exit" || line == "q" {
            return Composed::Exit;
        }

        self.lines.push(line.to_string());
        if !line.ends_with(';') {
            return Composed::Incomplete;
        }

        let query = self.lines.join(" ");
        self.lines.clear();
        Composed::Query(query)
    }

    /// True while a query is partially entered.
    pub fn is_composing(&self) -> bool {
        !self.lines.is_empty()
    }

    /// Discards any partially entered query (used on Ctrl-C).
    pub fn reset(&mut self) {
        self.lines.clear();
    }
}
