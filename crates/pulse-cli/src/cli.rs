//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Weekly status reports from task spreadsheets.
#[derive(Parser, Debug)]
#[command(name = "pulse", version, about = "Weekly status reports from task spreadsheets")]
pub struct Cli {
    /// Settings file (defaults to `~/.pulse/settings.json`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Skill packs root (overrides settings).
    #[arg(long, global = true)]
    pub skills_dir: Option<PathBuf>,

    /// Increase log verbosity (`-v` shows the processing trace, `-vv` debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Log filter: verbosity flags win over the configured level.
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        match self.verbose {
            0 => configured,
            1 => "info",
            _ => "debug",
        }
    }
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print weekly KPIs as JSON.
    Kpis(KpisArgs),
    /// Print the normalized task table as Markdown.
    Preview(PreviewArgs),
    /// List available skill packs.
    Skills,
    /// Generate a weekly report with the local model.
    Report(ReportArgs),
}

/// Arguments for `pulse kpis`.
#[derive(Args, Debug)]
pub struct KpisArgs {
    /// Task table (`.csv`, `.xlsx`, `.xls`, `.ods`).
    pub file: PathBuf,

    /// Reference time, `YYYY-MM-DD[ HH:MM]` (defaults to the local clock).
    #[arg(long)]
    pub now: Option<String>,
}

/// Arguments for `pulse preview`.
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Task table.
    pub file: PathBuf,

    /// Rows to show (defaults to the configured preview size).
    #[arg(long)]
    pub rows: Option<usize>,
}

/// Arguments for `pulse report`.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Task table.
    pub file: PathBuf,

    /// Skill pack to apply.
    #[arg(long)]
    pub skill: Option<String>,

    /// Natural-language request (defaults to the stock weekly-report request).
    #[arg(long)]
    pub request: Option<String>,

    /// Model tag.
    #[arg(long)]
    pub model: Option<String>,

    /// Ollama base URL.
    #[arg(long)]
    pub host: Option<String>,

    /// Sampling temperature (0.0..=1.5).
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Directory for the `.md`/`.docx` output.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Skip DOCX export.
    #[arg(long)]
    pub no_docx: bool,

    /// Print the prompt pair instead of calling the model.
    #[arg(long)]
    pub dry_run: bool,

    /// Reference time, `YYYY-MM-DD[ HH:MM]` (defaults to the local clock).
    #[arg(long)]
    pub now: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_flags() {
        let cli = Cli::parse_from([
            "pulse", "report", "tasks.xlsx", "--skill", "weekly_report", "--temperature", "0.7",
            "--no-docx", "--dry-run", "-v",
        ]);
        assert_eq!(cli.verbose, 1);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.file, PathBuf::from("tasks.xlsx"));
        assert_eq!(args.skill.as_deref(), Some("weekly_report"));
        assert_eq!(args.temperature, Some(0.7));
        assert!(args.no_docx && args.dry_run);
        assert!(args.out_dir.is_none());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["pulse", "skills", "--skills-dir", "/opt/skills", "-vv"]);
        assert!(matches!(cli.command, Command::Skills));
        assert_eq!(cli.skills_dir, Some(PathBuf::from("/opt/skills")));
        assert_eq!(cli.log_level("warn"), "debug");
    }

    #[test]
    fn configured_level_without_flags() {
        let cli = Cli::parse_from(["pulse", "preview", "a.csv", "--rows", "10"]);
        assert_eq!(cli.log_level("warn"), "warn");
        let Command::Preview(args) = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(args.rows, Some(10));
    }

    #[test]
    fn command_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
