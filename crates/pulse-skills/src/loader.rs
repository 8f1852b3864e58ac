//! Filesystem skill pack loader.
//!
//! A skill pack is a directory under the skills root containing
//! `skill.md`, `report_template.md`, and `rubric.yaml`.

use std::path::Path;

use tracing::{debug, warn};

use crate::constants::{MAX_SKILL_FILE_SIZE, RUBRIC_FILENAME, SKILL_MD_FILENAME, TEMPLATE_FILENAME};
use crate::errors::{Result, SkillError};
use crate::types::SkillPack;

/// Load the skill pack `name` from `root`.
pub fn load_skill_pack(root: &Path, name: &str) -> Result<SkillPack> {
    validate_name(name)?;

    let dir = root.join(name);
    if !dir.is_dir() {
        return Err(SkillError::NotFound(dir.display().to_string()));
    }

    let pack = SkillPack {
        name: name.to_string(),
        skill_md: read_pack_file(&dir, SKILL_MD_FILENAME)?,
        template_md: read_pack_file(&dir, TEMPLATE_FILENAME)?,
        rubric: read_pack_file(&dir, RUBRIC_FILENAME)?,
    };
    debug!(name, dir = %dir.display(), "loaded skill pack");
    Ok(pack)
}

/// Names of the skill packs under `root`, sorted.
///
/// Only subdirectories containing `skill.md` count. A missing root yields
/// an empty list.
pub fn list_skill_packs(root: &Path) -> Vec<String> {
    if !root.is_dir() {
        return Vec::new();
    }

    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %root.display(), error = %e, "failed to read skills directory");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| entry.path().join(SKILL_MD_FILENAME).is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}

/// Reject names that are empty or would resolve outside the root.
fn validate_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name.contains("..")
        || name.contains(['/', '\\'])
        || Path::new(name).is_absolute();
    if invalid {
        return Err(SkillError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn read_pack_file(dir: &Path, filename: &str) -> Result<String> {
    let path = dir.join(filename);
    let size = std::fs::metadata(&path)?.len();
    if size > MAX_SKILL_FILE_SIZE {
        return Err(SkillError::FileTooLarge {
            path: path.display().to_string(),
            size,
            max: MAX_SKILL_FILE_SIZE,
        });
    }
    Ok(std::fs::read_to_string(&path)?)
}
