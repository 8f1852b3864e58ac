//! Shared constants for the report pipeline.

/// Calendar date format used for due dates in KPIs, tables, and raw output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format for the `generated_at` field of a KPI summary.
pub const GENERATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Group key used in owner/project rollups when the grouping field is empty.
pub const UNSPECIFIED_GROUP: &str = "（未填写）";

/// Priority assigned to rows with no priority value.
pub const DEFAULT_PRIORITY: &str = "P2";

/// Status label for rows whose status is empty or null-like.
pub const UNKNOWN_STATUS: &str = "unknown";
