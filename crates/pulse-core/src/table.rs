//! Raw and canonical task tables.
//!
//! A [`RawTable`] is whatever the reader produced: arbitrary headers and
//! loosely typed cells. A [`CanonicalTable`] is the normalized form where
//! every row is a [`TaskRecord`] with all ten canonical fields present.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cell::Cell;
use crate::constants::{DATE_FORMAT, UNKNOWN_STATUS};

// ─────────────────────────────────────────────────────────────────────────────
// Raw table
// ─────────────────────────────────────────────────────────────────────────────

/// Untrusted input table: ordered headers plus rows aligned to them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Create an empty table with the given headers.
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with [`Cell::Missing`]; extra
    /// trailing cells beyond the header width are dropped.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), Cell::Missing);
        self.rows.push(row);
    }

    /// Column labels in source order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate one row as `(label, cell)` pairs.
    pub fn record(&self, row: usize) -> impl Iterator<Item = (&str, &Cell)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.rows.get(row).into_iter().flatten())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Canonical schema
// ─────────────────────────────────────────────────────────────────────────────

/// The ten canonical task fields, in schema order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    /// Project grouping key.
    Project,
    /// Sub-grouping key.
    Module,
    /// Task description.
    Task,
    /// Owner grouping key.
    Owner,
    /// Lifecycle state.
    Status,
    /// Priority label.
    Priority,
    /// Due date.
    DueDate,
    /// Completion percentage.
    Progress,
    /// Blocker description.
    Blocker,
    /// Risk description.
    Risk,
}

impl CanonicalField {
    /// All fields in schema order.
    pub const ALL: [Self; 10] = [
        Self::Project,
        Self::Module,
        Self::Task,
        Self::Owner,
        Self::Status,
        Self::Priority,
        Self::DueDate,
        Self::Progress,
        Self::Blocker,
        Self::Risk,
    ];

    /// Canonical column name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Module => "module",
            Self::Task => "task",
            Self::Owner => "owner",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::DueDate => "due_date",
            Self::Progress => "progress",
            Self::Blocker => "blocker",
            Self::Risk => "risk",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalized task lifecycle state.
///
/// Serialized as its label: `done`, `doing`, `blocked`, `todo`, `unknown`,
/// or the lowercased original text for [`Status::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// Finished.
    Done,
    /// In progress.
    Doing,
    /// Blocked.
    Blocked,
    /// Not started.
    Todo,
    /// Empty or null-like source value.
    Unknown,
    /// Unrecognized non-empty status, trimmed and lowercased.
    Other(String),
}

impl Status {
    /// The four lifecycle states counted individually in KPIs.
    pub const KNOWN: [Self; 4] = [Self::Done, Self::Doing, Self::Blocked, Self::Todo];

    /// Status label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Done => "done",
            Self::Doing => "doing",
            Self::Blocked => "blocked",
            Self::Todo => "todo",
            Self::Unknown => UNKNOWN_STATUS,
            Self::Other(s) => s,
        }
    }

    /// Whether this is one of the four lifecycle states.
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Done | Self::Doing | Self::Blocked | Self::Todo)
    }

    /// Rebuild a status from its label.
    ///
    /// This is the inverse of [`Status::as_str`], not a normalizer: any
    /// label other than the five fixed ones becomes [`Status::Other`], and
    /// an empty label becomes [`Status::Unknown`].
    pub fn from_label(label: &str) -> Self {
        match label {
            "done" => Self::Done,
            "doing" => Self::Doing,
            "blocked" => Self::Blocked,
            "todo" => Self::Todo,
            "" | UNKNOWN_STATUS => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// One normalized task row. All ten fields are always present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Project grouping key.
    pub project: Option<String>,
    /// Sub-grouping key.
    pub module: Option<String>,
    /// Task description.
    pub task: Option<String>,
    /// Owner grouping key.
    pub owner: Option<String>,
    /// Normalized lifecycle state.
    pub status: Status,
    /// `P0`..`P3`, or the uppercased original when unrecognized.
    pub priority: String,
    /// Parsed due date.
    pub due_date: Option<NaiveDate>,
    /// Completion percentage; `NaN` when unknown (serialized as `null`).
    #[serde(deserialize_with = "deserialize_progress")]
    pub progress: f64,
    /// Blocker description.
    pub blocker: Option<String>,
    /// Risk description.
    pub risk: Option<String>,
}

fn deserialize_progress<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl PartialEq for TaskRecord {
    fn eq(&self, other: &Self) -> bool {
        let same_progress = (self.progress.is_nan() && other.progress.is_nan())
            || self.progress == other.progress;
        same_progress
            && self.project == other.project
            && self.module == other.module
            && self.task == other.task
            && self.owner == other.owner
            && self.status == other.status
            && self.priority == other.priority
            && self.due_date == other.due_date
            && self.blocker == other.blocker
            && self.risk == other.risk
    }
}

impl TaskRecord {
    /// Due date formatted as `YYYY-MM-DD`.
    pub fn due_date_label(&self) -> Option<String> {
        self.due_date.map(|d| d.format(DATE_FORMAT).to_string())
    }
}

/// Normalized table: one [`TaskRecord`] per input row, in input order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalTable {
    records: Vec<TaskRecord>,
}

impl CanonicalTable {
    /// Wrap normalized records.
    pub fn new(records: Vec<TaskRecord>) -> Self {
        Self { records }
    }

    /// Rows in input order.
    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render back to a [`RawTable`] with canonical headers.
    ///
    /// Feeding the result through the normalizer again yields the same
    /// records, which is how idempotence is checked.
    pub fn to_raw(&self) -> RawTable {
        let headers = CanonicalField::ALL
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        let mut raw = RawTable::new(headers);
        for r in &self.records {
            let progress = if r.progress.is_nan() {
                Cell::Missing
            } else {
                Cell::Number(r.progress)
            };
            raw.push_row(vec![
                r.project.clone().into(),
                r.module.clone().into(),
                r.task.clone().into(),
                r.owner.clone().into(),
                Cell::text(r.status.as_str()),
                Cell::text(r.priority.as_str()),
                r.due_date_label().into(),
                progress,
                r.blocker.clone().into(),
                r.risk.clone().into(),
            ]);
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> TaskRecord {
        TaskRecord {
            project: Some("Alpha".into()),
            module: None,
            task: Some("Ship".into()),
            owner: Some("Zhang".into()),
            status: Status::Done,
            priority: "P1".into(),
            due_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            progress: f64::NAN,
            blocker: None,
            risk: None,
        }
    }

    #[test]
    fn push_row_pads_and_truncates() {
        let mut t = RawTable::new(vec!["a".into(), "b".into()]);
        t.push_row(vec![Cell::text("1")]);
        t.push_row(vec![Cell::text("1"), Cell::text("2"), Cell::text("3")]);
        assert_eq!(t.rows()[0], vec![Cell::text("1"), Cell::Missing]);
        assert_eq!(t.rows()[1].len(), 2);
    }

    #[test]
    fn record_iterates_pairs() {
        let mut t = RawTable::new(vec!["a".into(), "b".into()]);
        t.push_row(vec![Cell::text("x"), Cell::Number(1.0)]);
        let pairs: Vec<_> = t.record(0).collect();
        assert_eq!(pairs, vec![("a", &Cell::text("x")), ("b", &Cell::Number(1.0))]);
        assert_eq!(t.record(5).count(), 0);
    }

    #[test]
    fn status_labels_round_trip() {
        for s in [
            Status::Done,
            Status::Doing,
            Status::Blocked,
            Status::Todo,
            Status::Unknown,
            Status::Other("review".into()),
        ] {
            assert_eq!(Status::from_label(s.as_str()), s);
        }
        assert_eq!(Status::from_label(""), Status::Unknown);
    }

    #[test]
    fn status_known_set() {
        assert!(Status::Blocked.is_known());
        assert!(!Status::Unknown.is_known());
        assert!(!Status::Other("x".into()).is_known());
    }

    #[test]
    fn record_equality_treats_nan_progress_as_equal() {
        assert_eq!(record(), record());
        let mut other = record();
        other.progress = 10.0;
        assert_ne!(record(), other);
    }

    #[test]
    fn record_serializes_nan_progress_as_null() {
        let json = serde_json::to_value(record()).unwrap();
        assert!(json["progress"].is_null());
        assert_eq!(json["status"], "done");
        assert_eq!(json["due_date"], "2020-01-01");

        let back: TaskRecord = serde_json::from_value(json).unwrap();
        assert!(back.progress.is_nan());
        assert_eq!(back, record());
    }

    #[test]
    fn to_raw_uses_canonical_headers() {
        let table = CanonicalTable::new(vec![record()]);
        let raw = table.to_raw();
        let names: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(raw.headers(), names.as_slice());
        assert_eq!(raw.rows()[0][4], Cell::text("done"));
        assert_eq!(raw.rows()[0][6], Cell::text("2020-01-01"));
        assert_eq!(raw.rows()[0][7], Cell::Missing);
        assert_eq!(raw.rows()[0][1], Cell::Missing);
    }
}
