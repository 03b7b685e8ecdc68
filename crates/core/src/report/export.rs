//! Stateless export of an execution result to CSV.
//!
//! JSON export is plain serde serialization of the result; only CSV needs
//! hand-rolled shaping (header row from column metadata, quote escaping).

use super::result::ReportExecutionResult;

/// Render the result's data rows as CSV, one header row of field
/// identifiers followed by one line per row. Cells are quoted when they
/// contain commas, quotes, or newlines.
pub fn to_csv(result: &ReportExecutionResult) -> String {
    let mut out = String::new();

    let fields: Vec<&str> = result.metadata.columns.iter().map(|c| c.field).collect();
    push_row(&mut out, fields.iter().map(|f| f.to_string()));

    for row in &result.data {
        push_row(
            &mut out,
            fields.iter().map(|f| render_cell(row.get(*f))),
        );
    }

    out
}

fn push_row(out: &mut String, cells: impl Iterator<Item = String>) {
    let mut first = true;
    for cell in cells {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape(&cell));
    }
    out.push('\n');
}

fn render_cell(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn escape(cell: &str) -> String {
    if cell.contains(',') || cell.contains('"') || cell.contains('\n') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
