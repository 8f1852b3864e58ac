//! Chat model abstraction.

use async_trait::async_trait;
use pulse_core::Prompt;

use crate::errors::Result;

/// A chat model that turns a prompt pair into report text.
///
/// Implementors must be `Send + Sync` so a client can be shared across
/// tasks.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Model identifier (e.g. `"qwen3:14b"`).
    fn model(&self) -> &str;

    /// Send one non-streaming chat request and return the reply text.
    async fn chat(&self, prompt: &Prompt) -> Result<String>;
}
