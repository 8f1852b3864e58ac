//! Report pipeline stages shared by the subcommands.
//!
//! Each stage emits one `info` event so `pulse -v` shows the processing
//! trace: loaded file, parsed rows, normalized columns, loaded skill pack,
//! computed KPIs, built prompt, chat completed.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use pulse_core::constants::DATE_FORMAT;
use pulse_core::{CanonicalTable, Prompt};
use pulse_kpi::KpiSummary;
use pulse_skills::SkillPack;
use tracing::info;

/// Accepted `--now` formats besides a bare date.
const NOW_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Read and normalize a task table.
pub fn load_table(path: &Path) -> Result<CanonicalTable> {
    let raw = pulse_ingest::read_table(path)
        .with_context(|| format!("Failed to read task table: {}", path.display()))?;
    info!(file = %path.display(), "loaded file");
    info!(rows = raw.len(), "parsed rows");

    let table = pulse_ingest::normalize(&raw);
    info!("normalized columns");
    Ok(table)
}

/// Resolve the reference time: `--now` if given, else the local clock.
pub fn resolve_now(value: Option<&str>) -> Result<NaiveDateTime> {
    let Some(value) = value else {
        return Ok(Local::now().naive_local());
    };
    let s = value.trim();

    NOW_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
        .with_context(|| format!("Invalid time {s:?}: expected YYYY-MM-DD or YYYY-MM-DD HH:MM"))
}

/// Load the named skill pack from `root`.
pub fn load_skill(root: &Path, name: &str) -> Result<SkillPack> {
    let pack = pulse_skills::load_skill_pack(root, name)
        .with_context(|| format!("Failed to load skill pack {name:?} from {}", root.display()))?;
    info!(skill = %name, "loaded skill pack");
    Ok(pack)
}

/// KPIs plus the prompt built from them.
#[derive(Debug)]
pub struct PreparedReport {
    /// KPI snapshot embedded in the prompt.
    pub kpis: KpiSummary,
    /// Prompt pair for the model.
    pub prompt: Prompt,
}

/// Compute KPIs, compact the table, and compose the prompt.
///
/// A skill pack selects the skill prompt variant; otherwise the default
/// variant is used.
pub fn prepare_report(
    table: &CanonicalTable,
    request: &str,
    skill: Option<&SkillPack>,
    max_rows: usize,
    now: NaiveDateTime,
) -> PreparedReport {
    let kpis = pulse_kpi::compute(table, now);
    info!(total = kpis.total_tasks, overdue = kpis.overdue, "computed weekly kpis");

    let table_md = pulse_kpi::to_compact_table(table, max_rows);
    let prompt = match skill {
        Some(pack) => pulse_prompt::compose_with_skill(request, &kpis, &table_md, pack),
        None => pulse_prompt::compose_default(request, &kpis, &table_md),
    };
    info!(
        skill = skill.map(|s| s.name.as_str()),
        system_chars = prompt.system.chars().count(),
        user_chars = prompt.user.chars().count(),
        "built prompt"
    );

    PreparedReport { kpis, prompt }
}
