//! Tabular file decoding for roster imports.
//!
//! Uploaded roster files arrive as raw bytes plus a file name. The file name
//! selects a decoder ([`FileFormat::from_name`]); both decoders produce the
//! same shape -- an ordered list of rows with named, text-normalized cells --
//! so everything downstream is format-agnostic.
//!
//! Text normalization matters: spreadsheet cells carry native types, and a
//! numeric-looking licence plate must come out as the text the operator
//! typed, never as a float rendering (`7.0`) or scientific notation.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

/// UTF-8 BOM bytes, tolerated at the start of CSV files.
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Supported upload formats, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Select a format from a file name (case-insensitive extension match).
    ///
    /// Returns `None` for any extension other than `.csv` / `.xlsx`.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".csv") {
            Some(Self::Csv)
        } else if lower.ends_with(".xlsx") {
            Some(Self::Xlsx)
        } else {
            None
        }
    }
}

/// Whole-file decode failure. Any of these aborts the import before
/// per-row processing starts.
#[derive(Debug, thiserror::Error)]
pub enum TabularError {
    #[error("File is empty")]
    Empty,

    #[error("File has no header row")]
    NoHeader,

    #[error("Failed to parse CSV data: {0}")]
    Csv(String),

    #[error("Failed to parse spreadsheet: {0}")]
    Spreadsheet(String),
}

/// One data row: column name -> text cell value.
pub type Row = HashMap<String, String>;

/// A decoded tabular file: header names plus data rows in file order.
#[derive(Debug)]
pub struct TabularFile {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Decode raw file bytes with the decoder for `format`.
pub fn parse(data: &[u8], format: FileFormat) -> Result<TabularFile, TabularError> {
    match format {
        FileFormat::Csv => parse_csv(data),
        FileFormat::Xlsx => parse_xlsx(data),
    }
}

/// Strip a UTF-8 BOM from the beginning of the data if present.
fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(UTF8_BOM) {
        &data[UTF8_BOM.len()..]
    } else {
        data
    }
}

fn parse_csv(data: &[u8]) -> Result<TabularFile, TabularError> {
    let data = strip_utf8_bom(data);
    if data.is_empty() {
        return Err(TabularError::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TabularError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        return Err(TabularError::NoHeader);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| TabularError::Csv(e.to_string()))?;
        let mut row = Row::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let cell = record.get(idx).unwrap_or("").trim().to_string();
            row.insert(header.clone(), cell);
        }
        rows.push(row);
    }

    Ok(TabularFile { headers, rows })
}

fn parse_xlsx(data: &[u8]) -> Result<TabularFile, TabularError> {
    if data.is_empty() {
        return Err(TabularError::Empty);
    }

    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))
        .map_err(|e| TabularError::Spreadsheet(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TabularError::NoHeader)?
        .map_err(|e| TabularError::Spreadsheet(e.to_string()))?;

    let mut row_iter = range.rows();
    let header_cells = row_iter.next().ok_or(TabularError::NoHeader)?;
    let headers: Vec<String> = header_cells.iter().map(cell_to_text).collect();

    if headers.iter().all(String::is_empty) {
        return Err(TabularError::NoHeader);
    }

    let mut rows = Vec::new();
    for cells in row_iter {
        let mut row = Row::with_capacity(headers.len());
        let mut any_value = false;
        for (idx, header) in headers.iter().enumerate() {
            let cell = cells.get(idx).map(cell_to_text).unwrap_or_default();
            any_value |= !cell.is_empty();
            row.insert(header.clone(), cell);
        }
        // Spreadsheet ranges often trail off into blank rows; they carry no
        // data and are not counted as rows.
        if any_value {
            rows.push(row);
        }
    }

    Ok(TabularFile { headers, rows })
}

/// Render a spreadsheet cell as text.
///
/// Whole-number floats render without a fractional part (`7.0` -> `"7"`) and
/// Rust's float formatting never produces scientific notation, so a numeric
/// cell holding a plate number survives as the digits the operator entered.
/// Text cells pass through verbatim (minus surrounding whitespace).
fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_to_text(*f),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => float_to_text(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

fn float_to_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        format!("{}", f as i64)
    } else {
        format!("{f}")
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    // -- FileFormat tests -----------------------------------------------------

    #[test]
    fn csv_extension_selects_csv() {
        assert_eq!(FileFormat::from_name("roster.csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_name("ROSTER.CSV"), Some(FileFormat::Csv));
    }

    #[test]
    fn xlsx_extension_selects_xlsx() {
        assert_eq!(FileFormat::from_name("roster.xlsx"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::from_name("Roster.XLSX"), Some(FileFormat::Xlsx));
    }

    #[test]
    fn other_extensions_rejected() {
        assert_eq!(FileFormat::from_name("roster.xls"), None);
        assert_eq!(FileFormat::from_name("roster.txt"), None);
        assert_eq!(FileFormat::from_name("roster"), None);
    }

    // -- CSV decoding tests ---------------------------------------------------

    #[test]
    fn csv_basic_decode() {
        let data = b"email,first_name\na@example.com,Ada\nb@example.com,Ben";
        let file = parse(data, FileFormat::Csv).unwrap();
        assert_eq!(file.headers, vec!["email", "first_name"]);
        assert_eq!(file.rows.len(), 2);
        assert_eq!(file.rows[0]["email"], "a@example.com");
        assert_eq!(file.rows[1]["first_name"], "Ben");
    }

    #[test]
    fn csv_preserves_row_order() {
        let data = b"email\nfirst@example.com\nsecond@example.com\nthird@example.com";
        let file = parse(data, FileFormat::Csv).unwrap();
        let emails: Vec<&str> = file.rows.iter().map(|r| r["email"].as_str()).collect();
        assert_eq!(
            emails,
            vec!["first@example.com", "second@example.com", "third@example.com"]
        );
    }

    #[test]
    fn csv_strips_utf8_bom() {
        let mut data = UTF8_BOM.to_vec();
        data.extend_from_slice(b"email\na@example.com");
        let file = parse(&data, FileFormat::Csv).unwrap();
        assert_eq!(file.headers, vec!["email"]);
        assert_eq!(file.rows.len(), 1);
    }

    #[test]
    fn csv_short_record_yields_empty_cells() {
        let data = b"email,first_name,last_name\na@example.com,Ada";
        let file = parse(data, FileFormat::Csv).unwrap();
        assert_eq!(file.rows[0]["last_name"], "");
    }

    #[test]
    fn csv_headers_only_yields_zero_rows() {
        let data = b"email,first_name,last_name,license_plate,region";
        let file = parse(data, FileFormat::Csv).unwrap();
        assert_eq!(file.headers.len(), 5);
        assert!(file.rows.is_empty());
    }

    #[test]
    fn csv_empty_file_rejected() {
        let result = parse(b"", FileFormat::Csv);
        assert_matches!(result, Err(TabularError::Empty));
    }

    #[test]
    fn csv_quoted_cell_keeps_leading_zeros() {
        let data = b"license_plate\n\"007\"";
        let file = parse(data, FileFormat::Csv).unwrap();
        assert_eq!(file.rows[0]["license_plate"], "007");
    }

    #[test]
    fn csv_unquoted_numeric_cell_is_verbatim_text() {
        // CSV has no cell types; a bare 007 must still come through as "007".
        let data = b"license_plate\n007";
        let file = parse(data, FileFormat::Csv).unwrap();
        assert_eq!(file.rows[0]["license_plate"], "007");
    }

    // -- XLSX decoding tests --------------------------------------------------

    #[test]
    fn xlsx_garbage_bytes_rejected() {
        let result = parse(b"definitely not a zip archive", FileFormat::Xlsx);
        assert_matches!(result, Err(TabularError::Spreadsheet(_)));
    }

    #[test]
    fn xlsx_empty_file_rejected() {
        let result = parse(b"", FileFormat::Xlsx);
        assert_matches!(result, Err(TabularError::Empty));
    }

    // -- Cell normalization tests ---------------------------------------------

    #[test]
    fn whole_float_renders_as_integer() {
        assert_eq!(cell_to_text(&Data::Float(7.0)), "7");
        assert_eq!(cell_to_text(&Data::Float(123456.0)), "123456");
    }

    #[test]
    fn fractional_float_keeps_fraction_without_scientific_notation() {
        assert_eq!(cell_to_text(&Data::Float(7.5)), "7.5");
    }

    #[test]
    fn int_cell_renders_digits() {
        assert_eq!(cell_to_text(&Data::Int(42)), "42");
    }

    #[test]
    fn text_cell_passes_through_verbatim() {
        assert_eq!(cell_to_text(&Data::String("007".to_string())), "007");
        assert_eq!(cell_to_text(&Data::String("  AB 123 CD  ".to_string())), "AB 123 CD");
    }

    #[test]
    fn empty_and_error_cells_render_empty() {
        assert_eq!(cell_to_text(&Data::Empty), "");
    }
}
