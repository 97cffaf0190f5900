//! Column layout of the order spreadsheet
//!
//! The layout is stored as a small JSON file so a differently shaped export
//! can be scanned without recompiling. The default matches the order
//! export the tool was built for: order number in column D, identifiers in
//! columns A and B, component ISBN in column F, "VSet" marker in column L.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Where the scanner looks for each piece of information in a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanLayout {
    /// Column holding the order number on order header rows
    pub order_column: usize,
    /// At least one of these must be filled for a row to be an order header
    pub identifier_columns: Vec<usize>,
    /// Minimum number of filled cells on an order header row
    pub min_filled_cells: usize,
    /// Column that flags a row as a volume set component
    pub marker_column: usize,
    /// Substring the marker column must contain (case-sensitive)
    pub marker: String,
    /// Column holding the component ISBN
    pub isbn_column: usize,
}

impl Default for ScanLayout {
    fn default() -> Self {
        Self {
            order_column: 3,
            identifier_columns: vec![0, 1],
            min_filled_cells: 3,
            marker_column: 11,
            marker: "VSet".to_string(),
            isbn_column: 5,
        }
    }
}

impl ScanLayout {
    /// Load a layout from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the layout to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
