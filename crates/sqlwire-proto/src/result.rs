//! The query result exchanged between server and client.

/// Structured outcome of one query.
///
/// A `QueryResult` is either a data result (`error` is empty, zero or more
/// rows) or an error result (`error` is non-empty, `columns` and `rows` are
/// empty). It is created fresh per query on the server, serialized once, and
/// never outlives a single round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Ordered column names; the order is authoritative and matches each
    /// row's value order.
    pub columns: Vec<String>,
    /// Ordered rows; every row holds exactly `columns.len()` string cells.
    pub rows: Vec<Vec<String>>,
    /// Error message; when non-empty the query failed and `columns`/`rows`
    /// carry no data.
    pub error: String,
}

impl QueryResult {
    /// Creates a data result from column names and rows.
    pub fn with_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            columns,
            rows,
            error: String::new(),
        }
    }

    /// Creates an error result. Data fields are left empty.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            error: message.into(),
        }
    }

    /// Returns true if this result carries an error.
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Returns true if the result has at least one row.
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
