//! Schema normalizer.
//!
//! Maps arbitrary source columns onto the canonical ten-field schema, then
//! normalizes each cell. Normalization is a pure function of the input and
//! never fails: cells that cannot be interpreted degrade to `None`, `NaN`,
//! or [`Status::Unknown`].
//!
//! # Column mapping policy
//!
//! Canonical fields are visited in schema order. Each takes the first
//! unclaimed source column (in header order) whose trimmed, lowercased
//! label equals the field name or one of its aliases. A claimed column is
//! never reused, so a source column maps to at most one field. If two
//! fields ever shared an alias, the earlier field would win.

use chrono::NaiveDate;
use pulse_core::constants::DEFAULT_PRIORITY;
use pulse_core::{CanonicalField, CanonicalTable, Cell, RawTable, Status, TaskRecord};
use tracing::debug;

use crate::aliases::{COLUMN_ALIASES, NULL_LIKE, PRIORITY_WORDS, STATUS_ALIASES, STATUS_HEURISTICS};
use crate::dates::parse_date;

static MISSING: Cell = Cell::Missing;

/// Resolved source column per canonical field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    sources: [Option<usize>; 10],
}

impl ColumnMapping {
    /// Source column index feeding `field`, if any.
    pub fn source_for(&self, field: CanonicalField) -> Option<usize> {
        self.sources[field as usize]
    }

    /// Canonical fields with no source column.
    pub fn missing_fields(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .into_iter()
            .filter(|f| self.source_for(*f).is_none())
            .collect()
    }

    /// Source column indices not used by any canonical field.
    pub fn unmapped_columns(&self, width: usize) -> Vec<usize> {
        (0..width)
            .filter(|i| !self.sources.contains(&Some(*i)))
            .collect()
    }
}

/// Resolve which source column feeds each canonical field.
pub fn map_columns(headers: &[String]) -> ColumnMapping {
    let labels: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let mut claimed = vec![false; labels.len()];
    let mut mapping = ColumnMapping::default();

    for (field, aliases) in &COLUMN_ALIASES {
        let found = labels.iter().enumerate().position(|(i, label)| {
            !claimed[i] && (label == field.name() || aliases.contains(&label.as_str()))
        });
        if let Some(idx) = found {
            claimed[idx] = true;
            mapping.sources[*field as usize] = Some(idx);
        }
    }

    mapping
}

/// Normalize a raw table into the canonical schema.
pub fn normalize(raw: &RawTable) -> CanonicalTable {
    let mapping = map_columns(raw.headers());

    let unmapped: Vec<&str> = mapping
        .unmapped_columns(raw.headers().len())
        .into_iter()
        .map(|i| raw.headers()[i].as_str())
        .collect();
    debug!(
        rows = raw.len(),
        missing = ?mapping.missing_fields(),
        ?unmapped,
        "normalized columns"
    );

    let records = raw
        .rows()
        .iter()
        .map(|row| normalize_row(row, &mapping))
        .collect();
    CanonicalTable::new(records)
}

fn normalize_row(row: &[Cell], mapping: &ColumnMapping) -> TaskRecord {
    let cell = |field: CanonicalField| {
        mapping
            .source_for(field)
            .and_then(|i| row.get(i))
            .unwrap_or(&MISSING)
    };

    TaskRecord {
        project: normalize_text(cell(CanonicalField::Project)),
        module: normalize_text(cell(CanonicalField::Module)),
        task: normalize_text(cell(CanonicalField::Task)),
        owner: normalize_text(cell(CanonicalField::Owner)),
        status: normalize_status(cell(CanonicalField::Status)),
        priority: normalize_priority(cell(CanonicalField::Priority)),
        due_date: normalize_due_date(cell(CanonicalField::DueDate)),
        progress: normalize_progress(cell(CanonicalField::Progress)),
        blocker: normalize_text(cell(CanonicalField::Blocker)),
        risk: normalize_text(cell(CanonicalField::Risk)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cell normalizers
// ─────────────────────────────────────────────────────────────────────────────

/// Free-text field: trimmed, `None` when empty or missing.
pub fn normalize_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Missing => None,
        Cell::Number(n) if n.is_nan() => None,
        Cell::Number(n) => Some(n.to_string()),
        Cell::Text(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
    }
}

/// Lifecycle state from a status cell.
///
/// Exact synonyms are checked first, then substring heuristics in fixed
/// order (done, blocked, doing, todo). Unmatched values are kept as their
/// trimmed lowercase text.
pub fn normalize_status(cell: &Cell) -> Status {
    let s = cell.render().unwrap_or_default().trim().to_lowercase();
    if NULL_LIKE.contains(&s.as_str()) {
        return Status::Unknown;
    }

    for (label, aliases) in STATUS_ALIASES {
        if aliases.contains(&s.as_str()) {
            return Status::from_label(label);
        }
    }

    for (label, needles) in STATUS_HEURISTICS {
        if needles.iter().any(|n| s.contains(*n)) {
            return Status::from_label(label);
        }
    }

    Status::from_label(&s)
}

/// Priority label from a priority cell.
///
/// Null-like → `P2`; 高/中/低 and high/medium/low → `P0`/`P1`/`P2`;
/// everything else (including `P0`..`P3`) passes through uppercased.
pub fn normalize_priority(cell: &Cell) -> String {
    let s = cell.render().unwrap_or_default().trim().to_uppercase();
    if NULL_LIKE.contains(&s.to_lowercase().as_str()) {
        return DEFAULT_PRIORITY.to_string();
    }
    PRIORITY_WORDS
        .iter()
        .find(|(word, _)| *word == s)
        .map_or(s, |(_, label)| (*label).to_string())
}

/// Due date from a date cell.
///
/// Only text is parsed; spreadsheet readers convert native date cells to
/// ISO text before they get here.
pub fn normalize_due_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Text(s) => parse_date(s),
        Cell::Missing | Cell::Number(_) => None,
    }
}

/// Completion percentage from a progress cell.
///
/// Values in `[0, 1]` are fractions and are scaled to percent; other
/// numbers pass through unchanged. Text may carry a trailing `%`.
/// Anything unparsable yields `NaN`.
pub fn normalize_progress(cell: &Cell) -> f64 {
    match cell {
        Cell::Missing => f64::NAN,
        Cell::Number(n) => scale_fraction(*n),
        Cell::Text(s) => {
            let s = s.trim();
            let s = s.strip_suffix('%').unwrap_or(s).trim();
            s.parse::<f64>().map_or(f64::NAN, scale_fraction)
        }
    }
}

fn scale_fraction(value: f64) -> f64 {
    if !value.is_finite() {
        f64::NAN
    } else if (0.0..=1.0).contains(&value) {
        value * 100.0
    } else {
        value
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
