//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a partial
//! settings file only needs the keys it overrides.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};

/// Upper bound for the model request timeout, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 120;

/// Accepted sampling temperature range.
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 1.5);

/// Root settings type.
///
/// # JSON Format
///
/// ```json
/// {
///   "ollama": { "host": "http://127.0.0.1:11434", "model": "qwen3:14b" },
///   "report": { "maxTableRows": 25 },
///   "paths": { "skillsDir": "skills" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PulseSettings {
    /// Settings schema version.
    pub version: String,
    /// Local model endpoint.
    pub ollama: OllamaSettings,
    /// Report generation behavior.
    pub report: ReportSettings,
    /// Filesystem locations.
    pub paths: PathSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for PulseSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            ollama: OllamaSettings::default(),
            report: ReportSettings::default(),
            paths: PathSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl PulseSettings {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let (lo, hi) = TEMPERATURE_RANGE;
        if !(lo..=hi).contains(&self.ollama.temperature) {
            return Err(SettingsError::InvalidValue(format!(
                "ollama.temperature {} outside {lo}..={hi}",
                self.ollama.temperature
            )));
        }
        if self.ollama.timeout_secs == 0 || self.ollama.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(SettingsError::InvalidValue(format!(
                "ollama.timeoutSecs {} outside 1..={MAX_TIMEOUT_SECS}",
                self.ollama.timeout_secs
            )));
        }
        if self.report.max_table_rows == 0 {
            return Err(SettingsError::InvalidValue(
                "report.maxTableRows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Ollama chat endpoint settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OllamaSettings {
    /// Base URL of the Ollama server.
    pub host: String,
    /// Model tag to run.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Request timeout in seconds (at most [`MAX_TIMEOUT_SECS`]).
    pub timeout_secs: u64,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            host: "http://127.0.0.1:11434".to_string(),
            model: "qwen3:14b".to_string(),
            temperature: 0.3,
            timeout_secs: MAX_TIMEOUT_SECS,
        }
    }
}

/// Report generation settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportSettings {
    /// Rows of the task table embedded in the prompt.
    pub max_table_rows: usize,
    /// Rows shown by the `preview` command.
    pub preview_rows: usize,
    /// Skill pack used when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_skill: Option<String>,
    /// Whether to write a DOCX next to the Markdown report.
    pub write_docx: bool,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            max_table_rows: 25,
            preview_rows: 50,
            default_skill: None,
            write_docx: true,
        }
    }
}

/// Filesystem locations.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathSettings {
    /// Root directory containing skill packs (`<root>/<name>/skill.md`).
    pub skills_dir: String,
    /// Directory reports are written to.
    pub output_dir: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            skills_dir: "skills".to_string(),
            output_dir: ".".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = PulseSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.ollama.host, "http://127.0.0.1:11434");
        assert_eq!(settings.ollama.model, "qwen3:14b");
        assert_eq!(settings.ollama.timeout_secs, 120);
        assert_eq!(settings.report.max_table_rows, 25);
        assert_eq!(settings.paths.skills_dir, "skills");
        assert!(settings.report.write_docx);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(PulseSettings::default()).unwrap();
        assert_eq!(json["ollama"]["timeoutSecs"], 120);
        assert_eq!(json["report"]["maxTableRows"], 25);
        assert!(json["report"].get("defaultSkill").is_none());
    }

    #[test]
    fn rejects_temperature_out_of_range() {
        let mut settings = PulseSettings::default();
        settings.ollama.temperature = 2.0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn rejects_timeout_above_cap() {
        let mut settings = PulseSettings::default();
        settings.ollama.timeout_secs = 600;
        assert!(settings.validate().is_err());
        settings.ollama.timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_zero_table_rows() {
        let mut settings = PulseSettings::default();
        settings.report.max_table_rows = 0;
        assert!(settings.validate().is_err());
    }
}
