//! Weekly KPI aggregation.
//!
//! [`compute`] is a pure function of the normalized table and an injected
//! `now`. Calling it twice with the same inputs yields the same summary,
//! which keeps report retries consistent.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDateTime, NaiveTime};
use pulse_core::constants::{GENERATED_AT_FORMAT, UNSPECIFIED_GROUP};
use pulse_core::{CanonicalTable, Status, TaskRecord};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

/// Number of rows kept in [`KpiSummary::top_risks`].
pub const TOP_RISK_LIMIT: usize = 5;

/// Score added for a blocked task.
pub const BLOCKED_WEIGHT: u32 = 3;
/// Score added for an overdue task.
pub const OVERDUE_WEIGHT: u32 = 2;
/// Score added for a `P0`/`P1` task.
pub const PRIORITY_WEIGHT: u32 = 1;
/// Score added when the risk text flags a high risk.
pub const HIGH_RISK_WEIGHT: u32 = 2;

const URGENT_PRIORITIES: [&str; 2] = ["P0", "P1"];
const HIGH_RISK_MARKERS: [&str; 3] = ["高", "high", "p0"];

// ─────────────────────────────────────────────────────────────────────────────
// Summary types
// ─────────────────────────────────────────────────────────────────────────────

/// Deterministic snapshot of the week's task table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KpiSummary {
    /// `now` formatted as `YYYY-MM-DD HH:MM`.
    pub generated_at: String,
    /// Row count.
    pub total_tasks: usize,
    /// Rows with status `done`.
    pub done: usize,
    /// Rows with status `doing`.
    pub doing: usize,
    /// Rows with status `blocked`.
    pub blocked: usize,
    /// Rows with status `todo`.
    pub todo: usize,
    /// Rows past their due date and not done.
    pub overdue: usize,
    /// Status counts per owner.
    pub by_owner: Vec<GroupRollup>,
    /// Status counts per project.
    pub by_project: Vec<GroupRollup>,
    /// Highest-scoring rows, best first.
    pub top_risks: Vec<RiskEntry>,
}

/// Dimension a rollup is grouped on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupBy {
    /// Group by task owner.
    Owner,
    /// Group by project.
    Project,
}

impl GroupBy {
    /// Field name used as the group key in serialized output.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Project => "project",
        }
    }

    fn key_of(self, record: &TaskRecord) -> Option<&str> {
        match self {
            Self::Owner => record.owner.as_deref(),
            Self::Project => record.project.as_deref(),
        }
    }
}

/// Status counts for one owner or project.
///
/// `counts` holds an entry for every status label seen anywhere in the
/// table, zero when the group has none. Serializes flat, e.g.
/// `{"owner": "Zhang", "doing": 0, "done": 2}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupRollup {
    /// Grouping dimension.
    pub group_by: GroupBy,
    /// Group key; `None` for rows with the field unset.
    pub key: Option<String>,
    /// Rows per status label, ordered by label.
    pub counts: BTreeMap<String, usize>,
}

impl GroupRollup {
    /// Display label: the key, or `（未填写）` when unset.
    pub fn label(&self) -> &str {
        self.key.as_deref().unwrap_or(UNSPECIFIED_GROUP)
    }

    /// Count for one status (zero when unseen).
    pub fn count(&self, status: &Status) -> usize {
        self.counts.get(status.as_str()).copied().unwrap_or(0)
    }

    /// Rows in this group.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl Serialize for GroupRollup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len() + 1))?;
        map.serialize_entry(self.group_by.field_name(), self.label())?;
        for (status, count) in &self.counts {
            map.serialize_entry(status, count)?;
        }
        map.end()
    }
}

/// One row of the top-risk list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RiskEntry {
    /// Project.
    pub project: Option<String>,
    /// Module.
    pub module: Option<String>,
    /// Task.
    pub task: Option<String>,
    /// Owner.
    pub owner: Option<String>,
    /// Status.
    pub status: Status,
    /// Priority label.
    pub priority: String,
    /// Due date as `YYYY-MM-DD`; omitted when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Blocker text.
    pub blocker: Option<String>,
    /// Risk text.
    pub risk: Option<String>,
    /// Composite risk score.
    pub score: u32,
}

impl RiskEntry {
    fn new(record: &TaskRecord, score: u32) -> Self {
        Self {
            project: record.project.clone(),
            module: record.module.clone(),
            task: record.task.clone(),
            owner: record.owner.clone(),
            status: record.status.clone(),
            priority: record.priority.clone(),
            due_date: record.due_date_label(),
            blocker: record.blocker.clone(),
            risk: record.risk.clone(),
            score,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Computation
// ─────────────────────────────────────────────────────────────────────────────

/// Compute the weekly KPIs.
pub fn compute(table: &CanonicalTable, now: NaiveDateTime) -> KpiSummary {
    let records = table.records();
    let count = |status: &Status| records.iter().filter(|r| r.status == *status).count();

    let overdue: Vec<bool> = records.iter().map(|r| is_overdue(r, now)).collect();

    let mut scored: Vec<(u32, &TaskRecord)> = records
        .iter()
        .zip(&overdue)
        .map(|(r, &late)| (risk_score(r, late), r))
        .collect();
    // sort_by is stable: equal scores keep input order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    let top_risks = scored
        .into_iter()
        .take(TOP_RISK_LIMIT)
        .map(|(score, r)| RiskEntry::new(r, score))
        .collect();

    let summary = KpiSummary {
        generated_at: now.format(GENERATED_AT_FORMAT).to_string(),
        total_tasks: records.len(),
        done: count(&Status::Done),
        doing: count(&Status::Doing),
        blocked: count(&Status::Blocked),
        todo: count(&Status::Todo),
        overdue: overdue.iter().filter(|late| **late).count(),
        by_owner: rollup(records, GroupBy::Owner),
        by_project: rollup(records, GroupBy::Project),
        top_risks,
    };

    debug!(
        total = summary.total_tasks,
        done = summary.done,
        blocked = summary.blocked,
        overdue = summary.overdue,
        owners = summary.by_owner.len(),
        projects = summary.by_project.len(),
        "computed kpis"
    );
    summary
}

/// Whether a task is past due at `now`.
///
/// The due date counts from midnight, so a task due today is overdue for
/// any `now` after 00:00. Done tasks are never overdue.
pub fn is_overdue(record: &TaskRecord, now: NaiveDateTime) -> bool {
    record.status != Status::Done
        && record
            .due_date
            .is_some_and(|due| due.and_time(NaiveTime::MIN) < now)
}

/// Additive risk score for one row.
pub fn risk_score(record: &TaskRecord, overdue: bool) -> u32 {
    let mut score = 0;
    if record.status == Status::Blocked {
        score += BLOCKED_WEIGHT;
    }
    if overdue {
        score += OVERDUE_WEIGHT;
    }
    if URGENT_PRIORITIES.contains(&record.priority.to_uppercase().as_str()) {
        score += PRIORITY_WEIGHT;
    }
    if let Some(risk) = &record.risk {
        let risk = risk.to_lowercase();
        if HIGH_RISK_MARKERS.iter().any(|m| risk.contains(m)) {
            score += HIGH_RISK_WEIGHT;
        }
    }
    score
}

/// Pivot status counts by owner or project. Keys are sorted; the unset
/// group comes last.
fn rollup(records: &[TaskRecord], group_by: GroupBy) -> Vec<GroupRollup> {
    let labels: BTreeSet<&str> = records.iter().map(|r| r.status.as_str()).collect();
    let zeroed = || -> BTreeMap<String, usize> {
        labels.iter().map(|l| ((*l).to_string(), 0)).collect()
    };

    let mut keyed: BTreeMap<&str, BTreeMap<String, usize>> = BTreeMap::new();
    let mut unset: Option<BTreeMap<String, usize>> = None;

    for record in records {
        let counts = match group_by.key_of(record) {
            Some(key) => keyed.entry(key).or_insert_with(zeroed),
            None => unset.get_or_insert_with(zeroed),
        };
        if let Some(n) = counts.get_mut(record.status.as_str()) {
            *n += 1;
        }
    }

    keyed
        .into_iter()
        .map(|(key, counts)| GroupRollup {
            group_by,
            key: Some(key.to_string()),
            counts,
        })
        .chain(unset.map(|counts| GroupRollup {
            group_by,
            key: None,
            counts,
        }))
        .collect()
}
