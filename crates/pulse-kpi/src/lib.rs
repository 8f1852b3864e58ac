//! # pulse-kpi
//!
//! Deterministic metrics over a normalized task table.
//!
//! - [`aggregate::compute`]: status counts, overdue detection, risk scoring,
//!   owner/project rollups, and the top-risk list
//! - [`compact::to_compact_table`]: bounded Markdown table for prompt context
//!
//! Nothing here performs I/O or reads the clock; `now` is always injected.

#![deny(unsafe_code)]

pub mod aggregate;
pub mod compact;

pub use aggregate::{GroupBy, GroupRollup, KpiSummary, RiskEntry, compute, is_overdue, risk_score};
pub use compact::{DEFAULT_MAX_ROWS, to_compact_table};
