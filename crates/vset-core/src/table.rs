//! Raw spreadsheet rows as handed to the scanner

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All rows of one worksheet, in sheet order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    /// Row data, index 0 is the first row of the sheet
    pub rows: Vec<RawRow>,
    /// Source file path
    pub source_path: PathBuf,
}

impl Sheet {
    /// Create a new empty sheet
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            rows: Vec::new(),
            source_path,
        }
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// A row of cells indexed by column position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub cells: Vec<CellValue>,
}

impl RawRow {
    /// Create a new row
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Build a row from text cells, detecting each cell's type
    pub fn from_strs(cells: &[&str]) -> Self {
        Self::new(cells.iter().map(|s| CellValue::parse(s)).collect())
    }

    /// Get a cell value by column index, `None` past the end of the row
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    /// Cell at `index` unless it is missing or blank
    pub fn filled(&self, index: usize) -> Option<&CellValue> {
        self.get(index).filter(|c| !c.is_blank())
    }

    /// Number of cells holding a value
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_blank()).count()
    }
}

impl From<Vec<CellValue>> for RawRow {
    fn from(cells: Vec<CellValue>) -> Self {
        Self::new(cells)
    }
}

/// A cell value with type detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
    /// Empty/null cell
    Empty,
}

impl CellValue {
    /// Parse a string into a CellValue, detecting the type
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }

        if let Ok(f) = trimmed.parse::<f64>() {
            return CellValue::Float(f);
        }

        CellValue::String(trimmed.to_string())
    }

    /// Keep a text cell verbatim, only trimming it; blank text is `Empty`
    pub fn text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::String(trimmed.to_string())
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Empty, or a string with nothing but whitespace
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Convert to a display string
    ///
    /// Whole floats print without a fraction, so an ISBN stored as a number
    /// comes back as its 13 digits.
    pub fn to_string_value(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_value())
    }
}
