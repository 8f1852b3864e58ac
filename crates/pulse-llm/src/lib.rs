//! # pulse-llm
//!
//! Chat model client used to turn a composed prompt into report text.
//!
//! - [`ChatModel`]: the async seam the CLI talks to
//! - [`OllamaClient`]: non-streaming client for a local Ollama server
//! - [`ChatError`]: transport, status, and decoding failures

#![deny(unsafe_code)]

pub mod errors;
pub mod ollama;
pub mod provider;

pub use errors::{ChatError, Result};
pub use ollama::{OllamaClient, OllamaConfig};
pub use provider::ChatModel;
