//! Error types for table ingestion.
//!
//! Only whole-file problems are errors. Malformed cells are never reported
//! here; the normalizer degrades them to null/NaN/unknown instead.

/// Errors that can occur while reading an input table.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error opening or reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV framing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet decoding error.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// File extension is not a supported table format.
    #[error("Unsupported table format: {0}")]
    UnsupportedFormat(String),

    /// Spreadsheet contains no worksheet.
    #[error("Workbook has no worksheets: {0}")]
    EmptyWorkbook(String),
}

/// Result type for ingestion.
pub type Result<T> = std::result::Result<T, IngestError>;
