//! Skill pack file layout.

/// Instruction file; its presence marks a directory as a skill pack.
pub const SKILL_MD_FILENAME: &str = "skill.md";

/// Output template the report must follow.
pub const TEMPLATE_FILENAME: &str = "report_template.md";

/// Quality rubric (kept as opaque text).
pub const RUBRIC_FILENAME: &str = "rubric.yaml";

/// Maximum size of any single skill pack file (256 KiB).
pub const MAX_SKILL_FILE_SIZE: u64 = 256 * 1024;

/// Skills root used when nothing else is configured.
pub const DEFAULT_SKILLS_DIR: &str = "skills";
