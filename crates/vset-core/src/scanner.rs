//! Row scanner for recovering component ISBNs from an order spreadsheet
//!
//! Order exports interleave two kinds of rows: order header rows carrying
//! an order number, and line-item rows. Line items flagged as volume set
//! components carry an ISBN which belongs to the closest order header
//! above it.

use crate::isbn::{is_valid_isbn13, normalize};
use crate::layout::ScanLayout;
use crate::table::RawRow;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// A row that starts a new order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHeader {
    /// Position of the row in the sheet (0-based)
    pub row_index: usize,
    /// Order number as written in the order column
    pub order_number: String,
}

/// A component ISBN together with the order it was listed under
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// Normalized 13-digit ISBN
    pub isbn: String,
    /// Order number of the closest preceding header, if any
    pub order_number: Option<String>,
}

impl ComponentRecord {
    /// Create a new component record
    pub fn new(isbn: impl Into<String>, order_number: Option<String>) -> Self {
        Self {
            isbn: isbn.into(),
            order_number,
        }
    }
}

/// Extract component records using the default column layout
pub fn extract_components(rows: &[RawRow]) -> Vec<ComponentRecord> {
    extract_components_with(rows, &ScanLayout::default())
}

/// Extract component records from `rows`
///
/// Each (isbn, order number) pair appears once, in the row order of its
/// first occurrence. Rows with a missing or invalid ISBN are skipped.
pub fn extract_components_with(rows: &[RawRow], layout: &ScanLayout) -> Vec<ComponentRecord> {
    let headers = find_order_headers(rows, layout);
    info!(rows = rows.len(), headers = headers.len(), "found order headers");

    let mut seen: HashSet<(String, Option<String>)> = HashSet::new();
    let mut records = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        let Some(isbn) = component_isbn(row, row_index, layout) else {
            continue;
        };

        let order_number = preceding_order(&headers, row_index).map(str::to_string);

        if seen.insert((isbn.clone(), order_number.clone())) {
            debug!(
                row = row_index,
                isbn = %isbn,
                order = order_number.as_deref().unwrap_or("none"),
                "added component"
            );
            records.push(ComponentRecord::new(isbn, order_number));
        }
    }

    info!(components = records.len(), "extracted component ISBNs");
    records
}

/// Collect every order header row, in row order
pub fn find_order_headers(rows: &[RawRow], layout: &ScanLayout) -> Vec<OrderHeader> {
    rows.iter()
        .enumerate()
        .filter_map(|(row_index, row)| {
            let order_number = row.filled(layout.order_column)?.to_string_value();
            if !is_all_digits(&order_number) {
                return None;
            }

            let has_identifier = layout
                .identifier_columns
                .iter()
                .any(|&col| row.filled(col).is_some());
            if !has_identifier || row.filled_count() < layout.min_filled_cells {
                return None;
            }

            Some(OrderHeader {
                row_index,
                order_number,
            })
        })
        .collect()
}

/// Order number of the last header strictly above `row_index`
///
/// `headers` must be in ascending row order, as returned by
/// [`find_order_headers`]. A header on the same row never applies.
pub fn preceding_order(headers: &[OrderHeader], row_index: usize) -> Option<&str> {
    let idx = headers.partition_point(|h| h.row_index < row_index);
    idx.checked_sub(1).map(|i| headers[i].order_number.as_str())
}

/// Normalized ISBN of a marked component row, if it holds a valid one
fn component_isbn(row: &RawRow, row_index: usize, layout: &ScanLayout) -> Option<String> {
    let marker = row.filled(layout.marker_column)?;
    if !marker.to_string_value().contains(layout.marker.as_str()) {
        return None;
    }

    let Some(cell) = row.filled(layout.isbn_column) else {
        debug!(row = row_index, "component row has no ISBN");
        return None;
    };

    let isbn = normalize(&cell.to_string_value());
    if is_valid_isbn13(&isbn) {
        Some(isbn)
    } else {
        debug!(row = row_index, value = %cell, len = isbn.len(), "discarding invalid ISBN");
        None
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
