//! Subcommand implementations.
//!
//! Commands write their primary output to the supplied writer so they can
//! be driven from tests; logs go to stderr through `tracing`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use pulse_export::{markdown_to_docx, report_file_stem, write_docx, write_markdown};
use pulse_llm::{ChatModel, OllamaClient, OllamaConfig};
use pulse_prompt::DEFAULT_REQUEST;
use pulse_settings::{PulseSettings, TEMPERATURE_RANGE};
use tracing::{info, warn};

use crate::cli::{Command, KpisArgs, PreviewArgs, ReportArgs};
use crate::pipeline::{load_skill, load_table, prepare_report, resolve_now};

/// Run one subcommand.
pub async fn run(
    command: Command,
    settings: &PulseSettings,
    skills_root: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Kpis(args) => run_kpis(&args, out),
        Command::Preview(args) => run_preview(&args, settings, out),
        Command::Skills => run_skills(skills_root, out),
        Command::Report(args) => run_report(&args, settings, skills_root, out)
            .await
            .map(|_| ()),
    }
}

/// `pulse kpis`: print the KPI summary as pretty JSON.
pub fn run_kpis(args: &KpisArgs, out: &mut dyn Write) -> Result<()> {
    let now = resolve_now(args.now.as_deref())?;
    let table = load_table(&args.file)?;
    let kpis = pulse_kpi::compute(&table, now);
    writeln!(out, "{}", pulse_prompt::kpis_json(&kpis))?;
    Ok(())
}

/// `pulse preview`: print the first rows of the normalized table.
pub fn run_preview(args: &PreviewArgs, settings: &PulseSettings, out: &mut dyn Write) -> Result<()> {
    let rows = args.rows.unwrap_or(settings.report.preview_rows);
    let table = load_table(&args.file)?;
    writeln!(out, "{}", pulse_kpi::to_compact_table(&table, rows))?;
    if table.len() > rows {
        writeln!(out, "\n({rows} of {} rows shown)", table.len())?;
    }
    Ok(())
}

/// `pulse skills`: list skill packs under `root`, one per line.
pub fn run_skills(root: &Path, out: &mut dyn Write) -> Result<()> {
    let names = pulse_skills::list_skill_packs(root);
    if names.is_empty() {
        writeln!(out, "No skill packs found in {}", root.display())?;
    }
    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// Files written by `pulse report`.
#[derive(Debug, Default)]
pub struct ReportOutcome {
    /// Model reply; empty on a dry run.
    pub text: String,
    /// Markdown output path.
    pub markdown_path: Option<PathBuf>,
    /// DOCX output path, when exported.
    pub docx_path: Option<PathBuf>,
}

/// `pulse report`: build the prompt, call the model, and write outputs.
pub async fn run_report(
    args: &ReportArgs,
    settings: &PulseSettings,
    skills_root: &Path,
    out: &mut dyn Write,
) -> Result<ReportOutcome> {
    let config = ollama_config(args, settings)?;
    let client = OllamaClient::new(config).context("Invalid model configuration")?;
    generate_report(&client, args, settings, skills_root, out).await
}

/// Report generation against any [`ChatModel`].
pub async fn generate_report(
    model: &dyn ChatModel,
    args: &ReportArgs,
    settings: &PulseSettings,
    skills_root: &Path,
    out: &mut dyn Write,
) -> Result<ReportOutcome> {
    let now = resolve_now(args.now.as_deref())?;
    let table = load_table(&args.file)?;

    let skill_name = args.skill.as_deref().or(settings.report.default_skill.as_deref());
    let skill = skill_name
        .map(|name| load_skill(skills_root, name))
        .transpose()?;

    let request = args.request.as_deref().unwrap_or(DEFAULT_REQUEST);
    let prepared = prepare_report(
        &table,
        request,
        skill.as_ref(),
        settings.report.max_table_rows,
        now,
    );

    if args.dry_run {
        writeln!(out, "=== system ===\n{}\n", prepared.prompt.system)?;
        writeln!(out, "=== user ===\n{}", prepared.prompt.user)?;
        return Ok(ReportOutcome::default());
    }

    let text = match model.chat(&prepared.prompt).await {
        Ok(text) => text,
        Err(e) => {
            let category = e.category();
            warn!(model = %model.model(), category, error = %e, "chat failed");
            return Err(anyhow::Error::new(e)
                .context(format!("Model call failed ({}, {category})", model.model())));
        }
    };
    info!(model = %model.model(), "chat completed");
    writeln!(out, "{text}")?;

    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.paths.output_dir));
    let stem = report_file_stem(now);
    let markdown_path = write_markdown(&out_dir, &stem, &text)
        .with_context(|| format!("Failed to write report to {}", out_dir.display()))?;

    let docx_path = if args.no_docx || !settings.report.write_docx {
        None
    } else {
        export_docx(&out_dir, &stem, &text)
    };

    Ok(ReportOutcome {
        text,
        markdown_path: Some(markdown_path),
        docx_path,
    })
}

/// DOCX export is best-effort: failures are logged, not returned.
fn export_docx(dir: &Path, stem: &str, text: &str) -> Option<PathBuf> {
    let written = markdown_to_docx(text).and_then(|bytes| write_docx(dir, stem, &bytes));
    match written {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(error = %e, "docx export failed");
            None
        }
    }
}

/// Model settings with command-line overrides applied.
pub fn ollama_config(args: &ReportArgs, settings: &PulseSettings) -> Result<OllamaConfig> {
    let temperature = args.temperature.unwrap_or(settings.ollama.temperature);
    let (lo, hi) = TEMPERATURE_RANGE;
    ensure!(
        (lo..=hi).contains(&temperature),
        "temperature {temperature} outside {lo}..={hi}"
    );

    Ok(OllamaConfig {
        host: args.host.clone().unwrap_or_else(|| settings.ollama.host.clone()),
        model: args.model.clone().unwrap_or_else(|| settings.ollama.model.clone()),
        temperature,
        timeout: Duration::from_secs(settings.ollama.timeout_secs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let settings = PulseSettings::default();
        let args = ReportArgs {
            model: Some("llama3:8b".into()),
            temperature: Some(0.9),
            ..ReportArgs::default()
        };
        let config = ollama_config(&args, &settings).unwrap();
        assert_eq!(config.model, "llama3:8b");
        assert!((config.temperature - 0.9).abs() < f64::EPSILON);
        assert_eq!(config.host, settings.ollama.host);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn temperature_out_of_range_is_rejected() {
        let args = ReportArgs {
            temperature: Some(2.0),
            ..ReportArgs::default()
        };
        let err = ollama_config(&args, &PulseSettings::default()).unwrap_err();
        assert!(err.to_string().contains("outside"));
    }

    #[test]
    fn skills_listing_mentions_empty_root() {
        let mut out: Vec<u8> = Vec::new();
        run_skills(Path::new("/nonexistent/skills"), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("No skill packs found"));
    }
}
