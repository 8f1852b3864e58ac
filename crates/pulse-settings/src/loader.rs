//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`PulseSettings::default()`]
//! 2. If `~/.pulse/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//! 4. Validate ranges
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{MAX_TIMEOUT_SECS, PulseSettings, TEMPERATURE_RANGE};

/// Resolve the path to the settings file (`~/.pulse/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".pulse").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<PulseSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON or an out-of-range value, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<PulseSettings> {
    load_settings_with(path, |name| std::env::var(name).ok())
}

/// Load settings from `path`, resolving overrides through `lookup`.
pub fn load_settings_with<F>(path: &Path, lookup: F) -> Result<PulseSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = serde_json::to_value(PulseSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: PulseSettings = serde_json::from_value(merged)?;
    apply_overrides(&mut settings, lookup);
    settings.validate()?;
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply overrides from the process environment.
pub fn apply_env_overrides(settings: &mut PulseSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides resolved through `lookup`.
///
/// Recognized keys: `OLLAMA_HOST`, `OLLAMA_MODEL`, `PULSE_TEMPERATURE`,
/// `PULSE_TIMEOUT_SECS`, `PULSE_SKILLS_DIR`, `PULSE_OUTPUT_DIR`,
/// `PULSE_MAX_ROWS`, `PULSE_LOG_LEVEL`. Invalid values are ignored with a
/// warning and the file/default value is kept.
pub fn apply_overrides<F>(settings: &mut PulseSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let env = EnvReader { lookup };

    // ── Ollama ──────────────────────────────────────────────────────
    if let Some(v) = env.string("OLLAMA_HOST") {
        settings.ollama.host = v;
    }
    if let Some(v) = env.string("OLLAMA_MODEL") {
        settings.ollama.model = v;
    }
    if let Some(v) = env.f64_range("PULSE_TEMPERATURE", TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1) {
        settings.ollama.temperature = v;
    }
    if let Some(v) = env.u64_range("PULSE_TIMEOUT_SECS", 1, MAX_TIMEOUT_SECS) {
        settings.ollama.timeout_secs = v;
    }

    // ── Report / paths / logging ────────────────────────────────────
    if let Some(v) = env.usize_range("PULSE_MAX_ROWS", 1, 10_000) {
        settings.report.max_table_rows = v;
    }
    if let Some(v) = env.string("PULSE_SKILLS_DIR") {
        settings.paths.skills_dir = v;
    }
    if let Some(v) = env.string("PULSE_OUTPUT_DIR") {
        settings.paths.output_dir = v;
    }
    if let Some(v) = env.string("PULSE_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a finite `f64` within a range.
pub fn parse_f64_range(val: &str, min: f64, max: f64) -> Option<f64> {
    let n: f64 = val.trim().parse().ok()?;
    (n.is_finite() && n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn u64_range(&self, name: &str, min: u64, max: u64) -> Option<u64> {
        let val = (self.lookup)(name)?;
        let result = parse_u64_range(&val, min, max);
        if result.is_none() {
            warn!(key = name, value = %val, "invalid u64 env var, ignoring");
        }
        result
    }

    fn usize_range(&self, name: &str, min: usize, max: usize) -> Option<usize> {
        let val = (self.lookup)(name)?;
        let result = parse_usize_range(&val, min, max);
        if result.is_none() {
            warn!(key = name, value = %val, "invalid usize env var, ignoring");
        }
        result
    }

    fn f64_range(&self, name: &str, min: f64, max: f64) -> Option<f64> {
        let val = (self.lookup)(name)?;
        let result = parse_f64_range(&val, min, max);
        if result.is_none() {
            warn!(key = name, value = %val, "invalid float env var, ignoring");
        }
        result
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::SettingsError;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"ollama": {"host": "a", "model": "m"}});
        let source = serde_json::json!({"ollama": {"model": "n"}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["ollama"]["host"], "a");
        assert_eq!(merged["ollama"]["model"], "n");
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4]});
        let merged = deep_merge(target, source);
        assert_eq!(merged["items"], serde_json::json!([4]));
    }

    // ── load_settings_with ──────────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let settings = load_settings_with(Path::new("/nonexistent/settings.json"), no_env).unwrap();
        assert_eq!(settings.ollama.model, "qwen3:14b");
        assert_eq!(settings.report.max_table_rows, 25);
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"ollama": {"model": "llama3"}, "report": {"defaultSkill": "weekly_report"}}"#,
        )
        .unwrap();

        let settings = load_settings_with(&path, no_env).unwrap();
        assert_eq!(settings.ollama.model, "llama3");
        assert_eq!(settings.ollama.host, "http://127.0.0.1:11434");
        assert_eq!(settings.report.default_skill.as_deref(), Some("weekly_report"));
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        let err = load_settings_with(&path, no_env).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn load_out_of_range_file_value_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"ollama": {"timeoutSecs": 900}}"#).unwrap();

        let err = load_settings_with(&path, no_env).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue(_)));
    }

    #[test]
    fn env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"ollama": {"host": "http://file:1"}}"#).unwrap();

        let env = env_of(&[
            ("OLLAMA_HOST", "http://env:2"),
            ("PULSE_TEMPERATURE", "0.7"),
            ("PULSE_SKILLS_DIR", "/opt/skills"),
        ]);
        let settings = load_settings_with(&path, env).unwrap();
        assert_eq!(settings.ollama.host, "http://env:2");
        assert!((settings.ollama.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(settings.paths.skills_dir, "/opt/skills");
    }

    #[test]
    fn invalid_env_values_are_ignored() {
        let mut settings = PulseSettings::default();
        apply_overrides(
            &mut settings,
            env_of(&[
                ("PULSE_TIMEOUT_SECS", "9999"),
                ("PULSE_TEMPERATURE", "hot"),
                ("PULSE_MAX_ROWS", "0"),
                ("OLLAMA_MODEL", ""),
            ]),
        );
        assert_eq!(settings.ollama.timeout_secs, 120);
        assert!((settings.ollama.temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(settings.report.max_table_rows, 25);
        assert_eq!(settings.ollama.model, "qwen3:14b");
    }

    // ── parsers ─────────────────────────────────────────────────────

    #[test]
    fn parse_u64_bounds() {
        assert_eq!(parse_u64_range("60", 1, 120), Some(60));
        assert_eq!(parse_u64_range("0", 1, 120), None);
        assert_eq!(parse_u64_range("121", 1, 120), None);
        assert_eq!(parse_u64_range("abc", 1, 120), None);
    }

    #[test]
    fn parse_f64_rejects_non_finite() {
        assert_eq!(parse_f64_range("NaN", 0.0, 1.5), None);
        assert_eq!(parse_f64_range("inf", 0.0, 1.5), None);
        assert_eq!(parse_f64_range(" 1.5 ", 0.0, 1.5), Some(1.5));
    }

    #[test]
    fn parse_usize_bounds() {
        assert_eq!(parse_usize_range("50", 1, 10_000), Some(50));
        assert_eq!(parse_usize_range("0", 1, 10_000), None);
    }
}
