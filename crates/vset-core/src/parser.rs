//! Readers turning order spreadsheets into raw rows

use crate::error::{Error, Result};
use crate::table::{CellValue, RawRow, Sheet};
use calamine::{open_workbook_auto, Data, Reader};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Spreadsheet extensions read through calamine
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Load the rows of an order spreadsheet
///
/// Workbooks contribute their first worksheet. CSV files are read without a
/// header row, since the first line of an order export is data.
pub fn load_sheet<P: AsRef<Path>>(path: P) -> Result<Sheet> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let sheet = if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        parse_workbook(path)?
    } else if extension == "csv" {
        parse_csv(path)?
    } else {
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    };

    info!(path = %path.display(), rows = sheet.row_count(), "loaded spreadsheet");
    Ok(sheet)
}

/// Read the first worksheet of an Excel or OpenDocument workbook
///
/// Rows and columns keep their absolute sheet positions: a used range that
/// starts at C3 is padded so that column C is still index 2.
pub fn parse_workbook<P: AsRef<Path>>(path: P) -> Result<Sheet> {
    let path = path.as_ref();
    let workbook_error = |message: String| Error::Workbook {
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| Error::EmptyWorkbook(path.to_path_buf()))?;
    debug!(sheet = %sheet_name, "reading first worksheet");

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| workbook_error(format!("sheet '{}': {}", sheet_name, e)))?;

    let mut sheet = Sheet::new(path.to_path_buf());
    let Some((start_row, start_col)) = range.start() else {
        return Ok(sheet);
    };

    sheet.rows = vec![RawRow::default(); start_row as usize];
    for data_row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(data_row.iter().map(cell_from_data));
        sheet.rows.push(RawRow::new(cells));
    }

    Ok(sheet)
}

/// Map a calamine cell onto a CellValue
fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::String(b.to_string()),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

/// Read a CSV export of an order spreadsheet
///
/// CSV has no cell types, so every cell stays text: "0042" keeps its
/// leading zeros and "1.0" is not read as a number.
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<Sheet> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    read_csv(BufReader::new(file), path)
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<Sheet> {
    read_csv(content.as_bytes(), Path::new(source_name))
}

fn read_csv<R: Read>(reader: R, path: &Path) -> Result<Sheet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // Order exports have ragged rows
        .from_reader(reader);

    let mut sheet = Sheet::new(path.to_path_buf());
    for result in csv_reader.records() {
        let record = result.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;

        sheet
            .rows
            .push(RawRow::new(record.iter().map(CellValue::text).collect()));
    }

    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_parse_csv_without_header() {
        let csv = "Customer,ACC-1,,55\n,,,,,9780306406157,,,,,,VSet\n";
        let sheet = parse_csv_str(csv, "orders.csv").unwrap();

        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.rows[0].get(3), Some(&CellValue::String("55".to_string())));
        assert_eq!(sheet.rows[0].get(2), Some(&CellValue::Empty));
        assert_eq!(
            sheet.rows[1].get(11),
            Some(&CellValue::String("VSet".to_string()))
        );
    }

    #[test]
    fn test_csv_order_numbers_keep_their_text() {
        let csv = "\
Cust,A,,0042
,,,,,9780306406157,,,,,,VSet
Cust,A,,1.0
,,,,,9780000000002,,,,,,VSet
Cust,A,,1e2
,,,,,9781000000009,,,,,,VSet
";
        let sheet = parse_csv_str(csv, "orders.csv").unwrap();
        let records = crate::scanner::extract_components(&sheet.rows);

        let orders: Vec<(&str, Option<&str>)> = records
            .iter()
            .map(|r| (r.isbn.as_str(), r.order_number.as_deref()))
            .collect();
        assert_eq!(
            orders,
            vec![
                ("9780306406157", Some("0042")),
                ("9780000000002", Some("0042")),
                ("9781000000009", Some("0042")),
            ]
        );
    }

    #[test]
    fn test_parse_ragged_rows() {
        let csv = "a\nb,c,d\n\"quoted, value\",e\n";
        let sheet = parse_csv_str(csv, "ragged.csv").unwrap();

        assert_eq!(sheet.rows[0].cells.len(), 1);
        assert_eq!(sheet.rows[1].cells.len(), 3);
        assert_eq!(
            sheet.rows[2].get(0),
            Some(&CellValue::String("quoted, value".to_string()))
        );
    }

    #[test]
    fn test_load_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Orders.CSV");
        fs::write(&path, "x,y,z,1\n").unwrap();

        let sheet = load_sheet(&path).unwrap();
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.source_path, path);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_sheet("orders.pdf").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));

        let err = load_sheet("orders").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_sheet("/nonexistent/orders.csv").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));

        let err = load_sheet("/nonexistent/orders.xlsx").unwrap_err();
        assert!(matches!(err, Error::Workbook { .. }));
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Int(7)), CellValue::Integer(7));
        assert_eq!(
            cell_from_data(&Data::Float(9780306406157.0)).to_string_value(),
            "9780306406157"
        );
        assert_eq!(cell_from_data(&Data::String("  ".to_string())), CellValue::Empty);
        assert_eq!(
            cell_from_data(&Data::Bool(true)),
            CellValue::String("true".to_string())
        );
        assert_eq!(cell_from_data(&Data::Empty), CellValue::Empty);
    }
}
