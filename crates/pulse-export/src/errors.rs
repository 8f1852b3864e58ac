//! Error types for report export.

/// Errors that can occur while writing report files.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error writing an output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// DOCX packaging failed.
    #[error("DOCX error: {0}")]
    Docx(String),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
