//! # pulse
//!
//! Turns a task spreadsheet into weekly KPIs and a model-written status
//! report.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pulse_cli::cli::Cli;
use pulse_cli::commands;
use pulse_settings::{load_settings, load_settings_from_path};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Settings first: they carry the default log level
    let settings = match &args.config {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => load_settings().context("Failed to load settings")?,
    };
    pulse_core::logging::init_subscriber(args.log_level(&settings.logging.level));

    let skills_root = args
        .skills_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&settings.paths.skills_dir));
    tracing::debug!(skills_root = %skills_root.display(), "resolved skills root");

    let mut stdout = std::io::stdout().lock();
    commands::run(args.command, &settings, &skills_root, &mut stdout).await
}
