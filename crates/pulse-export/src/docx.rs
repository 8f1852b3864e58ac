//! Line-oriented Markdown to DOCX conversion.
//!
//! This is a literal mapping, not a Markdown renderer: each line becomes
//! one paragraph. `#`/`##`/`###` prefixes become headings and `- ` becomes
//! a bullet; everything else (tables, emphasis, code) is kept as plain
//! text.

use std::io::Cursor;

use docx_rs::{
    AbstractNumbering, Docx, IndentLevel, Level, LevelJc, LevelText, NumberFormat, Numbering,
    NumberingId, Paragraph, Run, Start, Style, StyleType,
};
use tracing::debug;

use crate::errors::{ExportError, Result};

const BULLET_NUMBERING_ID: usize = 1;

/// How a single Markdown line is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Heading of level 1 to 3.
    Heading(u8, &'a str),
    /// Bulleted paragraph.
    Bullet(&'a str),
    /// Plain paragraph (possibly empty).
    Paragraph(&'a str),
}

/// Classify one line. Trailing whitespace is dropped first.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let line = line.trim_end();
    if let Some(text) = line.strip_prefix("# ") {
        LineKind::Heading(1, text)
    } else if let Some(text) = line.strip_prefix("## ") {
        LineKind::Heading(2, text)
    } else if let Some(text) = line.strip_prefix("### ") {
        LineKind::Heading(3, text)
    } else if let Some(text) = line.strip_prefix("- ") {
        LineKind::Bullet(text)
    } else {
        LineKind::Paragraph(line)
    }
}

/// Build a DOCX document from report Markdown.
pub fn markdown_to_docx(markdown: &str) -> Result<Vec<u8>> {
    let mut doc = base_document();
    let mut lines = 0usize;

    for line in markdown.lines() {
        doc = doc.add_paragraph(paragraph_for(classify_line(line)));
        lines += 1;
    }

    let mut buf = Cursor::new(Vec::new());
    doc.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    let bytes = buf.into_inner();
    debug!(lines, bytes = bytes.len(), "built docx");
    Ok(bytes)
}

fn paragraph_for(kind: LineKind<'_>) -> Paragraph {
    match kind {
        LineKind::Heading(level, text) => text_paragraph(text).style(&format!("Heading{level}")),
        LineKind::Bullet(text) => text_paragraph(text).numbering(
            NumberingId::new(BULLET_NUMBERING_ID),
            IndentLevel::new(0),
        ),
        LineKind::Paragraph(text) => text_paragraph(text),
    }
}

fn text_paragraph(text: &str) -> Paragraph {
    if text.is_empty() {
        Paragraph::new()
    } else {
        Paragraph::new().add_run(Run::new().add_text(text))
    }
}

/// Empty document with heading styles and a bullet list definition.
fn base_document() -> Docx {
    let mut doc = Docx::new();
    for (level, size) in [(1, 32), (2, 28), (3, 24)] {
        doc = doc.add_style(
            Style::new(&format!("Heading{level}"), StyleType::Paragraph)
                .name(&format!("Heading {level}"))
                .size(size)
                .bold(),
        );
    }
    doc.add_abstract_numbering(AbstractNumbering::new(BULLET_NUMBERING_ID).add_level(
        Level::new(
            0,
            Start::new(1),
            NumberFormat::new("bullet"),
            LevelText::new("•"),
            LevelJc::new("left"),
        ),
    ))
    .add_numbering(Numbering::new(BULLET_NUMBERING_ID, BULLET_NUMBERING_ID))
}
