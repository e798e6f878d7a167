//! Conversion of dynamically typed column values into wire strings.
//!
//! SQLite reports row values dynamically typed, with an explicit null state.
//! That dynamic-ness is confined to this module: values become a [`Field`]
//! immediately after retrieval and collapse to plain strings before they
//! reach the codec.

use rusqlite::types::ValueRef;

use super::error::{DatabaseError, DatabaseResult};

/// The textual form substituted for a null column value.
pub const NULL_LITERAL: &str = "NULL";

/// A column value at the database boundary: null, or already text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// The column held SQL NULL.
    Null,
    /// Any non-null value, rendered to its generic textual form.
    Text(String),
}

impl Field {
    /// Converts a raw SQLite value. Non-null values take their generic
    /// string representation; there is no per-type special casing beyond
    /// the null check.
    pub fn from_sql(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Field::Null,
            ValueRef::Integer(i) => Field::Text(i.to_string()),
            ValueRef::Real(f) => Field::Text(f.to_string()),
            ValueRef::Text(t) => Field::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Field::Text(String::from_utf8_lossy(b).into_owned()),
        }
    }

    /// Renders the field for the wire.
    pub fn encode(self) -> String {
        match self {
            Field::Null => NULL_LITERAL.to_string(),
            Field::Text(s) => s,
        }
    }
}

/// Accumulates one row's encoded values, enforcing the column width.
///
/// Every finished row holds exactly as many cells as the statement has
/// columns, so downstream code never sees a ragged row.
#[derive(Debug)]
pub struct RowBuilder {
    width: usize,
    cells: Vec<String>,
}

impl RowBuilder {
    /// Creates a builder for a row of `width` columns.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            cells: Vec::with_capacity(width),
        }
    }

    /// Appends the next column's value.
    pub fn push(&mut self, field: Field) {
        self.cells.push(field.encode());
    }

    /// Completes the row, failing if the cell count does not match the
    /// column count.
    pub fn finish(self) -> DatabaseResult<Vec<String>> {
        if self.cells.len() != self.width {
            return Err(DatabaseError::RowWidth {
                expected: self.width,
                got: self.cells.len(),
            });
        }
        Ok(self.cells)
    }
}
