//! Pipe-delimited text tables for notification bodies and model prompts.

use crate::extract::Record;
use serde_json::Value;
use thiserror::Error;

/// Rendered in place of a table when there are no records.
pub const NO_DATA: &str = "No data available.";

pub const COLUMN_SEPARATOR: &str = " | ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("record {row} is missing column '{key}'")]
    MissingKey { row: usize, key: String },
}

/// Renders `records` as a header line, a dash separator of the same width,
/// and one line per record.
///
/// Columns come from the first record's keys in their original order. Every
/// other record must carry all of those keys; extra keys are not rendered.
pub fn format_table(records: &[Record]) -> Result<String, TableError> {
    let Some(first) = records.first() else {
        return Ok(NO_DATA.to_string());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let header_line = headers.join(COLUMN_SEPARATOR);

    let separator_line = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(records.len() + 2);
    lines.push(header_line);
    lines.push(separator_line);

    for (row, record) in records.iter().enumerate() {
        let cells = headers
            .iter()
            .map(|key| {
                record
                    .get(*key)
                    .map(render_cell)
                    .ok_or_else(|| TableError::MissingKey {
                        row,
                        key: key.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        lines.push(cells.join(COLUMN_SEPARATOR));
    }

    Ok(lines.join("\n"))
}

/// Strings render bare; anything else renders as compact JSON.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
