//! Skill pack types.

use serde::Serialize;

/// A named bundle of report instructions, output template, and rubric.
///
/// All three parts are opaque text; the rubric is never parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkillPack {
    /// Directory name of the pack.
    pub name: String,
    /// Contents of `skill.md`.
    pub skill_md: String,
    /// Contents of `report_template.md`.
    pub template_md: String,
    /// Contents of `rubric.yaml`.
    pub rubric: String,
}
