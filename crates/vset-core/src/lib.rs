//! vset-core: Core library for reverse-searching multi-volume book sets
//!
//! This library provides functionality to:
//! - Read order spreadsheets (Excel, OpenDocument or CSV) into raw rows
//! - Recover component ISBNs and the order each was listed under
//! - Look each component up in a reference catalog of volume sets
//! - Group the results per set and order for reporting

pub mod catalog;
pub mod error;
pub mod grouper;
pub mod isbn;
pub mod layout;
pub mod matcher;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod table;

pub use catalog::{Catalog, VolumeSet, VolumeSetRecord, UNKNOWN_TITLE};
pub use error::{Error, Result};
pub use grouper::{group, FoundGroup, GroupedReport, NotFoundGroup, VolumeRow, NO_ORDER};
pub use isbn::is_valid_isbn13;
pub use layout::ScanLayout;
pub use matcher::{match_all, MatchRecord};
pub use parser::{load_sheet, parse_csv_str};
pub use report::{search, search_with, SearchReport, Summary};
pub use scanner::{extract_components, extract_components_with, ComponentRecord, OrderHeader};
pub use table::{CellValue, RawRow, Sheet};
