//! Error types for skill pack loading.

/// Errors that can occur while loading a skill pack.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    /// I/O error reading a pack file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No pack directory with this name under the skills root.
    #[error("Skill pack not found: {0}")]
    NotFound(String),

    /// Pack name is empty or would escape the skills root.
    #[error("Invalid skill pack name: {0:?}")]
    InvalidName(String),

    /// Pack file exceeds maximum size.
    #[error("Skill file too large: {path} ({size} bytes > {max} bytes)")]
    FileTooLarge {
        /// Path to the oversized file.
        path: String,
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },
}

/// Result type for skill operations.
pub type Result<T> = std::result::Result<T, SkillError>;
