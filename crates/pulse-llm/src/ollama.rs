//! Ollama `/api/chat` client.
//!
//! Sends one non-streaming request per report. No retries are attempted;
//! callers decide what to do with a [`ChatError`].

use std::time::Duration;

use async_trait::async_trait;
use pulse_core::Prompt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{ChatError, Result};
use crate::provider::ChatModel;

/// Default Ollama endpoint.
pub const DEFAULT_HOST: &str = "http://127.0.0.1:11434";
/// Default model tag.
pub const DEFAULT_MODEL: &str = "qwen3:14b";
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
/// Request timeout; also the upper bound for configured timeouts.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(120);

/// Error bodies longer than this are truncated in [`ChatError::Status`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Connection settings for [`OllamaClient`].
#[derive(Clone, Debug, PartialEq)]
pub struct OllamaConfig {
    /// Base URL, e.g. `http://127.0.0.1:11434`.
    pub host: String,
    /// Model tag.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Request timeout, capped at [`MAX_TIMEOUT`].
    pub timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: MAX_TIMEOUT,
        }
    }
}

impl OllamaConfig {
    /// Full chat endpoint URL.
    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host.trim_end_matches('/'))
    }

    fn validate(&self) -> Result<()> {
        let host = self.host.trim();
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(invalid(format!("host must be an http(s) URL, got {:?}", self.host)));
        }
        if self.model.trim().is_empty() {
            return Err(invalid("model must not be empty"));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(invalid(format!("temperature must be >= 0, got {}", self.temperature)));
        }
        if self.timeout.is_zero() {
            return Err(invalid("timeout must be positive"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ChatError {
    ChatError::InvalidConfig {
        message: message.into(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    options: ChatOptions,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for a local Ollama server.
pub struct OllamaClient {
    client: reqwest::Client,
    config: OllamaConfig,
    url: String,
}

impl OllamaClient {
    /// Build a client. Fails on an invalid config; timeouts above
    /// [`MAX_TIMEOUT`] are clamped.
    pub fn new(mut config: OllamaConfig) -> Result<Self> {
        config.validate()?;
        if config.timeout > MAX_TIMEOUT {
            warn!(
                requested_secs = config.timeout.as_secs(),
                max_secs = MAX_TIMEOUT.as_secs(),
                "clamping model timeout"
            );
            config.timeout = MAX_TIMEOUT;
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("pulse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let url = config.chat_url();
        Ok(Self {
            client,
            config,
            url,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(&self, prompt: &Prompt) -> Result<String> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            options: ChatOptions {
                temperature: self.config.temperature,
            },
            stream: false,
        };

        debug!(url = %self.url, model = %self.config.model, "sending chat request");
        let response = self.client.post(&self.url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                message: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let bytes = response.bytes().await?;
        let parsed: ChatResponse = serde_json::from_slice(&bytes)?;
        let content = parsed
            .message
            .map(|m| m.content.trim().to_string())
            .unwrap_or_default();

        debug!(model = %self.config.model, chars = content.chars().count(), "received chat response");
        Ok(content)
    }
}
