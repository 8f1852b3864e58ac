//! Output file naming and writing.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::info;

use crate::errors::Result;

/// File stem for a report generated at `now`: `weekly_report_YYYYMMDD_HHMM`.
pub fn report_file_stem(now: NaiveDateTime) -> String {
    format!("weekly_report_{}", now.format("%Y%m%d_%H%M"))
}

/// Write `<dir>/<stem>.md`, creating `dir` if needed.
pub fn write_markdown(dir: &Path, stem: &str, text: &str) -> Result<PathBuf> {
    write_output(dir, &format!("{stem}.md"), text.as_bytes())
}

/// Write `<dir>/<stem>.docx`, creating `dir` if needed.
pub fn write_docx(dir: &Path, stem: &str, bytes: &[u8]) -> Result<PathBuf> {
    write_output(dir, &format!("{stem}.docx"), bytes)
}

fn write_output(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote report file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn stem_uses_minute_resolution() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 6)
            .unwrap()
            .and_hms_opt(9, 5, 59)
            .unwrap();
        assert_eq!(report_file_stem(now), "weekly_report_20240306_0905");
    }

    #[test]
    fn writes_markdown_into_new_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out").join("reports");
        let path = write_markdown(&dir, "weekly_report_x", "# 周报\n").unwrap();
        assert_eq!(path, dir.join("weekly_report_x.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# 周报\n");
    }

    #[test]
    fn writes_docx_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_docx(tmp.path(), "r", b"PK\x03\x04").unwrap();
        assert!(path.ends_with("r.docx"));
        assert_eq!(std::fs::read(path).unwrap(), b"PK\x03\x04");
    }
}
