//! Output formatting for query results.
//!
//! The default is a styled table; JSON, CSV, and raw tab-separated output
//! are available for scripting.

use comfy_table::{Cell, ContentArrangement, Table};
use serde_json::{json, Value as JsonValue};

use sqlwire_proto::QueryResult;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Formatted table output.
    Table,
    /// JSON output (array of objects keyed by column name).
    Json,
    /// CSV output.
    Csv,
    /// Raw output (values separated by tabs).
    Raw,
}

/// Formats a query result according to the specified format.
pub fn format_result(result: &QueryResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => render_table(&result.columns, &result.rows),
        OutputFormat::Json => format_json(result),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Raw => format_raw(result),
    }
}

/// Renders headers and rows as a table.
///
/// Deterministic: header order and row order are preserved exactly as
/// received. Rows are assumed to match the header width; ragged input is
/// the table engine's problem, not re-validated here.
pub fn render_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();

    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    if !columns.is_empty() {
        table.set_header(columns.iter().map(Cell::new));
    }

    for row in rows {
        table.add_row(row.iter().map(Cell::new));
    }

    table.to_string()
}

fn format_json(result: &QueryResult) -> String {
    let rows: Vec<JsonValue> = result
        .rows
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            for (i, value) in row.iter().enumerate() {
                let col_name = result
                    .columns
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("column_{}", i));
                obj.insert(col_name, json!(value));
            }
            JsonValue::Object(obj)
        })
        .collect();

    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
}

fn format_csv(result: &QueryResult) -> String {
    let mut output = String::new();

    if !result.columns.is_empty() {
        let header: Vec<String> = result.columns.iter().map(|c| escape_csv(c)).collect();
        output.push_str(&header.join(","));
        output.push('\n');
    }

    for row in &result.rows {
        let values: Vec<String> = row.iter().map(|v| escape_csv(v)).collect();
        output.push_str(&values.join(","));
        output.push('\n');
    }

    output
}

fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn format_raw(result: &QueryResult) -> String {
    let mut output = String::new();

    if !result.columns.is_empty() {
        output.push_str(&result.columns.join("\t"));
        output.push('\n');
    }

    for row in &result.rows {
        output.push_str(&row.join("\t"));
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_result() -> QueryResult {
        QueryResult::with_rows(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec!["1".to_string(), "Alice".to_string()],
                vec!["2".to_string(), "NULL".to_string()],
            ],
        )
    }

    #[test]
    fn test_render_table() {
        let result = make_test_result();
        let output = render_table(&result.columns, &result.rows);
        assert!(output.contains("id"));
        assert!(output.contains("name"));
        assert!(output.contains("Alice"));
        assert!(output.contains("NULL"));
    }

    #[test]
    fn test_render_table_preserves_row_order() {
        let result = make_test_result();
        let output = render_table(&result.columns, &result.rows);
        let alice = output.find("Alice").unwrap();
        let null = output.find("NULL").unwrap();
        assert!(alice < null);
    }

    #[test]
    fn test_format_json() {
        let result = make_test_result();
        let output = format_result(&result, OutputFormat::Json);

        let parsed: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["name"], "Alice");
        // Wire values are plain strings; JSON output does not re-type them.
        assert_eq!(parsed[0]["id"], "1");
    }

    #[test]
    fn test_format_csv() {
        let result = make_test_result();
        let output = format_result(&result, OutputFormat::Csv);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,name");
        assert_eq!(lines[1], "1,Alice");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("hello"), "hello");
        assert_eq!(escape_csv("hello,world"), "\"hello,world\"");
        assert_eq!(escape_csv("hello\"world"), "\"hello\"\"world\"");
    }

    #[test]
    fn test_format_raw() {
        let result = make_test_result();
        let output = format_result(&result, OutputFormat::Raw);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id\tname");
        assert_eq!(lines[2], "2\tNULL");
    }
}
