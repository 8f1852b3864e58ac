//! Error types for the model client.

/// Errors that can occur during a chat request.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Model server error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        message: String,
    },

    /// Response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Client configuration rejected before any request.
    #[error("Invalid model config: {message}")]
    InvalidConfig {
        /// What was wrong.
        message: String,
    },
}

impl ChatError {
    /// Short category string for logs and error context.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Http(_) => "network",
            Self::Status { .. } => "api",
            Self::Json(_) => "parse",
            Self::InvalidConfig { .. } => "config",
        }
    }
}

/// Result type for chat operations.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_display_and_category() {
        let err = ChatError::Status {
            status: 503,
            message: "loading model".into(),
        };
        assert_eq!(err.category(), "api");
        assert_eq!(err.to_string(), "Model server error (503): loading model");
    }

    #[test]
    fn config_and_parse_categories() {
        let err = ChatError::InvalidConfig {
            message: "empty model".into(),
        };
        assert_eq!(err.category(), "config");

        let err = ChatError::from(serde_json::from_str::<u8>("x").unwrap_err());
        assert_eq!(err.category(), "parse");
    }
}
