//! # pulse-skills
//!
//! Loads skill packs: directories holding `skill.md`, `report_template.md`
//! and `rubric.yaml` that steer report generation. The skills root is
//! always passed in explicitly.

#![deny(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SkillError};
pub use loader::{list_skill_packs, load_skill_pack};
pub use types::SkillPack;
