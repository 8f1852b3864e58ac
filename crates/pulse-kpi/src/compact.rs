//! Compact Markdown rendering of the task table.
//!
//! Keeps prompt context bounded: only the first `max_rows` rows are
//! rendered, in input order. Rendering never touches the table itself.

use pulse_core::{CanonicalField, CanonicalTable, TaskRecord};

/// Rows rendered when the caller does not choose a limit.
pub const DEFAULT_MAX_ROWS: usize = 25;

/// Render the first `max_rows` rows as a Markdown pipe table.
///
/// Columns follow canonical field order. Unset values render as empty
/// cells; `NaN` progress renders empty.
pub fn to_compact_table(table: &CanonicalTable, max_rows: usize) -> String {
    let mut lines = Vec::with_capacity(max_rows.min(table.len()) + 2);

    lines.push(pipe_row(CanonicalField::ALL.iter().map(|f| f.name().to_string())));
    lines.push(pipe_row(CanonicalField::ALL.iter().map(|_| "---".to_string())));
    for record in table.records().iter().take(max_rows) {
        lines.push(pipe_row(row_cells(record)));
    }

    lines.join("\n")
}

fn row_cells(r: &TaskRecord) -> [String; 10] {
    let text = |v: &Option<String>| v.as_deref().map(escape_cell).unwrap_or_default();
    [
        text(&r.project),
        text(&r.module),
        text(&r.task),
        text(&r.owner),
        escape_cell(r.status.as_str()),
        escape_cell(&r.priority),
        r.due_date_label().unwrap_or_default(),
        format_progress(r.progress),
        text(&r.blocker),
        text(&r.risk),
    ]
}

fn pipe_row(cells: impl IntoIterator<Item = String>) -> String {
    let mut line = String::from("|");
    for cell in cells {
        line.push(' ');
        line.push_str(&cell);
        line.push_str(" |");
    }
    line
}

/// Progress in its shortest decimal form; empty for `NaN`.
pub fn format_progress(progress: f64) -> String {
    if progress.is_nan() {
        String::new()
    } else {
        progress.to_string()
    }
}

/// Make a value safe inside a pipe-table cell.
fn escape_cell(value: &str) -> String {
    value
        .replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace('|', "\\|")
}
