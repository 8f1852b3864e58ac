//! Table readers.
//!
//! Produces a [`RawTable`] from CSV or spreadsheet files. Readers only deal
//! with framing: headers come from the first row, cells keep their native
//! kind (text vs number), and empty cells become [`Cell::Missing`]. All
//! interpretation is left to the normalizer.

use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use pulse_core::constants::DATE_FORMAT;
use pulse_core::{Cell, RawTable};
use tracing::{debug, info, warn};

use crate::dates::from_excel_serial;
use crate::errors::{IngestError, Result};

/// Supported input formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma-separated values.
    Csv,
    /// Excel / OpenDocument workbook (first worksheet is read).
    Spreadsheet,
}

impl TableFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }
}

/// Read a task table from disk, dispatching on the file extension.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let format = TableFormat::from_path(path)
        .ok_or_else(|| IngestError::UnsupportedFormat(path.display().to_string()))?;

    let table = match format {
        TableFormat::Csv => read_csv(std::fs::File::open(path)?)?,
        TableFormat::Spreadsheet => read_spreadsheet(path)?,
    };

    info!(
        path = %path.display(),
        ?format,
        rows = table.len(),
        columns = table.headers().len(),
        "loaded table"
    );
    Ok(table)
}

/// Read CSV from any reader. The first record is the header row.
///
/// Rows may be ragged; short rows are padded with missing cells. Bytes that
/// are not valid UTF-8 are replaced with U+FFFD instead of failing the file.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim_start_matches('\u{feff}').to_string())
        .collect();
    let mut table = RawTable::new(headers);

    let mut lossy_rows = 0usize;
    for record in rdr.byte_records() {
        let record = record?;
        if std::str::from_utf8(record.as_slice()).is_err() {
            lossy_rows += 1;
        }
        let row = record.iter().map(|field| csv_cell(&String::from_utf8_lossy(field))).collect();
        table.push_row(row);
    }
    if lossy_rows > 0 {
        warn!(rows = lossy_rows, "csv rows contained invalid UTF-8; replaced bad bytes");
    }

    debug!(rows = table.len(), "parsed csv");
    Ok(table)
}

fn csv_cell(field: &str) -> Cell {
    if field.trim().is_empty() {
        Cell::Missing
    } else {
        Cell::text(field)
    }
}

/// Read the first worksheet of a workbook.
pub fn read_spreadsheet(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| IngestError::EmptyWorkbook(path.display().to_string()))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(RawTable::default());
    };
    let headers = header_row
        .iter()
        .map(|c| spreadsheet_cell(c).render().unwrap_or_default())
        .collect();

    let mut table = RawTable::new(headers);
    for row in rows {
        table.push_row(row.iter().map(spreadsheet_cell).collect());
    }

    debug!(rows = table.len(), "parsed worksheet");
    Ok(table)
}

/// Convert a workbook cell. Native date cells become ISO text so the date
/// normalizer sees the same shape as CSV input.
#[allow(clippy::cast_precision_loss)]
fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::String(s) => csv_cell(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::text(b.to_string()),
        Data::DateTime(dt) => from_excel_serial(dt.as_f64())
            .map_or(Cell::Missing, |ts| Cell::text(ts.format(DATE_FORMAT).to_string())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    #[test]
    fn csv_headers_and_rows() {
        let data = "项目,负责人,状态\nAlpha,Zhang,已完成\nBeta,,进行中\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.headers(), ["项目", "负责人", "状态"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], Cell::text("Alpha"));
        assert_eq!(table.rows()[1][1], Cell::Missing);
    }

    #[test]
    fn csv_strips_bom_and_keeps_quoted_commas() {
        let data = "\u{feff}task,blocker\n\"Write, review\",none\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.headers()[0], "task");
        assert_eq!(table.rows()[0][0], Cell::text("Write, review"));
    }

    #[test]
    fn csv_ragged_rows_are_padded() {
        let data = "a,b,c\n1\n1,2,3,4\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.rows()[0], vec![Cell::text("1"), Cell::Missing, Cell::Missing]);
        assert_eq!(table.rows()[1].len(), 3);
    }

    #[test]
    fn csv_empty_input() {
        let table = read_csv("".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert!(table.headers().is_empty());
    }

    #[test]
    fn format_detection() {
        assert_eq!(TableFormat::from_path(Path::new("a.CSV")), Some(TableFormat::Csv));
        assert_eq!(
            TableFormat::from_path(Path::new("tasks.xlsx")),
            Some(TableFormat::Spreadsheet)
        );
        assert_eq!(TableFormat::from_path(Path::new("tasks.txt")), None);
        assert_eq!(TableFormat::from_path(Path::new("tasks")), None);
    }

    #[test]
    fn unsupported_extension_is_error() {
        let err = read_table(Path::new("/tmp/tasks.json")).unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat(_)));
    }

    #[test]
    fn read_table_from_csv_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tasks.csv");
        std::fs::write(&path, "task,owner\nShip,Li\n").unwrap();
        let table = read_table(&path).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn missing_csv_file_is_io_error() {
        let err = read_table(Path::new("/nonexistent/tasks.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }

    #[test]
    fn spreadsheet_cell_conversion() {
        assert_eq!(spreadsheet_cell(&Data::Empty), Cell::Missing);
        assert_eq!(spreadsheet_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(spreadsheet_cell(&Data::Float(0.5)), Cell::Number(0.5));
        assert_eq!(spreadsheet_cell(&Data::String("  ".into())), Cell::Missing);
        assert_eq!(spreadsheet_cell(&Data::Bool(true)), Cell::text("true"));
    }

    #[test]
    fn spreadsheet_date_cells_become_iso_text() {
        let date = ExcelDateTime::new(45359.0, ExcelDateTimeType::DateTime, false);
        assert_eq!(spreadsheet_cell(&Data::DateTime(date)), Cell::text("2024-03-08"));

        let with_time = ExcelDateTime::new(45359.75, ExcelDateTimeType::DateTime, false);
        assert_eq!(spreadsheet_cell(&Data::DateTime(with_time)), Cell::text("2024-03-08"));

        assert_eq!(
            spreadsheet_cell(&Data::DateTimeIso("2024-03-08T10:00:00".into())),
            Cell::text("2024-03-08T10:00:00")
        );
    }

    #[test]
    fn csv_invalid_utf8_is_replaced_not_rejected() {
        // GBK bytes for "张" in the owner cell
        let mut data = b"task,owner\nShip,".to_vec();
        data.extend_from_slice(&[0xd5, 0xc5]);
        data.extend_from_slice(b"\nPlan,Li\n");

        let table = read_csv(data.as_slice()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], Cell::text("Ship"));
        assert_eq!(table.rows()[0][1], Cell::text("\u{fffd}\u{fffd}"));
        assert_eq!(table.rows()[1][1], Cell::text("Li"));
    }
}
