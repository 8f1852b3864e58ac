//! Lookup tables driving schema normalization.
//!
//! Everything here is data: adding a synonym is an edit to a table, not to
//! the normalizer. All entries are lowercase (priority words uppercase)
//! because lookups compare against trimmed, case-folded input.

use pulse_core::CanonicalField;

/// Column label synonyms per canonical field, in canonical field order.
///
/// Each list leads with the canonical name itself.
pub static COLUMN_ALIASES: [(CanonicalField, &[&str]); 10] = [
    (
        CanonicalField::Project,
        &["project", "项目", "项目名称", "proj", "工程", "project_name"],
    ),
    (
        CanonicalField::Module,
        &["module", "模块", "子系统", "workstream", "领域"],
    ),
    (
        CanonicalField::Task,
        &["task", "任务", "事项", "需求", "issue", "title"],
    ),
    (
        CanonicalField::Owner,
        &["owner", "负责人", "owner_name", "assignee", "经办人"],
    ),
    (
        CanonicalField::Status,
        &["status", "状态", "进度状态", "stage"],
    ),
    (
        CanonicalField::Priority,
        &["priority", "优先级", "p", "prio"],
    ),
    (
        CanonicalField::DueDate,
        &["due_date", "截止", "截止日期", "deadline", "due", "计划完成日期"],
    ),
    (
        CanonicalField::Progress,
        &["progress", "完成度", "percent", "百分比", "进展"],
    ),
    (
        CanonicalField::Blocker,
        &["blocker", "阻塞", "障碍", "block", "问题", "风险点"],
    ),
    (
        CanonicalField::Risk,
        &["risk", "风险", "risk_level", "风险等级"],
    ),
];

/// Exact status synonyms keyed by canonical status label.
pub const STATUS_ALIASES: [(&str, &[&str]); 4] = [
    ("done", &["done", "完成", "已完成", "closed", "resolved"]),
    ("doing", &["doing", "进行中", "开发中", "处理中", "in progress"]),
    ("blocked", &["blocked", "阻塞", "卡住", "blocked by", "block"]),
    ("todo", &["todo", "未开始", "待办", "open", "pending"]),
];

/// Substring fallbacks tried in order when no exact synonym matches.
pub const STATUS_HEURISTICS: [(&str, &[&str]); 4] = [
    ("done", &["完", "close"]),
    ("blocked", &["阻", "block"]),
    ("doing", &["进行", "progress", "doing"]),
    ("todo", &["未", "todo", "open"]),
];

/// Strings treated as an absent value after trimming and lowercasing.
pub const NULL_LIKE: [&str; 3] = ["", "nan", "none"];

/// Priority words (uppercased) mapped to priority labels.
pub const PRIORITY_WORDS: [(&str, &str); 6] = [
    ("高", "P0"),
    ("HIGH", "P0"),
    ("中", "P1"),
    ("MEDIUM", "P1"),
    ("低", "P2"),
    ("LOW", "P2"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_for_label(label: &str) -> impl Iterator<Item = CanonicalField> + '_ {
        COLUMN_ALIASES
            .iter()
            .filter(move |(field, aliases)| field.name() == label || aliases.contains(&label))
            .map(|(field, _)| *field)
    }

    #[test]
    fn column_aliases_follow_canonical_order() {
        let order: Vec<CanonicalField> = COLUMN_ALIASES.iter().map(|(f, _)| *f).collect();
        assert_eq!(order, CanonicalField::ALL.to_vec());
    }

    #[test]
    fn aliases_are_lowercase() {
        for (_, aliases) in COLUMN_ALIASES {
            for alias in aliases {
                assert_eq!(*alias, alias.to_lowercase(), "alias {alias} not lowercase");
            }
        }
        for (_, aliases) in STATUS_ALIASES.iter().chain(STATUS_HEURISTICS.iter()) {
            for alias in *aliases {
                assert_eq!(*alias, alias.to_lowercase());
            }
        }
    }

    #[test]
    fn no_alias_is_shared_between_fields() {
        for (field, aliases) in COLUMN_ALIASES {
            for alias in aliases {
                let owners: Vec<_> = fields_for_label(alias).collect();
                assert_eq!(owners, vec![field], "alias {alias} claimed by {owners:?}");
            }
        }
    }

    #[test]
    fn canonical_names_match_their_field() {
        for field in CanonicalField::ALL {
            assert_eq!(fields_for_label(field.name()).next(), Some(field));
        }
    }
}
