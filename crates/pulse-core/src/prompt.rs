//! Prompt pair handed to a chat model.

use serde::{Deserialize, Serialize};

/// System and user messages for a single chat request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// System message (role, rules, optional skill instructions).
    pub system: String,
    /// User message (request plus grounding data).
    pub user: String,
}

impl Prompt {
    /// Build a prompt pair.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}
