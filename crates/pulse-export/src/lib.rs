//! # pulse-export
//!
//! Writes generated reports to disk.
//!
//! - [`files`]: `weekly_report_YYYYMMDD_HHMM` naming and file writers
//! - [`docx`]: one-paragraph-per-line Markdown to DOCX conversion

#![deny(unsafe_code)]

pub mod docx;
pub mod errors;
pub mod files;

pub use docx::{LineKind, classify_line, markdown_to_docx};
pub use errors::{ExportError, Result};
pub use files::{report_file_stem, write_docx, write_markdown};
