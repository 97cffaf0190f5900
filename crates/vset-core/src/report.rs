//! End-to-end search: rows in, grouped report out

use crate::catalog::Catalog;
use crate::error::Result;
use crate::grouper::{group, GroupedReport};
use crate::layout::ScanLayout;
use crate::matcher::{match_all, MatchRecord};
use crate::scanner::extract_components_with;
use crate::table::RawRow;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Headline counts for a search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Distinct (isbn, order) pairs searched
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
}

impl Summary {
    /// Count found and missing components
    pub fn from_matches(matches: &[MatchRecord<'_>]) -> Self {
        let found = matches.iter().filter(|m| m.is_found()).count();
        Self {
            total: matches.len(),
            found,
            not_found: matches.len() - found,
        }
    }
}

/// Everything a reporting layer needs to present one search
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport<'a> {
    /// Name of the spreadsheet the rows came from
    pub source: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub groups: GroupedReport<'a>,
}

impl SearchReport<'_> {
    /// Record which spreadsheet the rows came from
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Check if no component ISBNs were found in the input
    pub fn is_empty(&self) -> bool {
        self.summary.total == 0
    }
}

/// Run scan, match and group with the default column layout
pub fn search<'a>(rows: &[RawRow], catalog: &'a Catalog) -> Result<SearchReport<'a>> {
    search_with(rows, catalog, &ScanLayout::default())
}

/// Run scan, match and group over `rows`
///
/// An unloaded catalog is reported even when the rows hold no components.
pub fn search_with<'a>(
    rows: &[RawRow],
    catalog: &'a Catalog,
    layout: &ScanLayout,
) -> Result<SearchReport<'a>> {
    let components = extract_components_with(rows, layout);
    let matches = match_all(&components, catalog)?;

    Ok(SearchReport {
        source: None,
        generated_at: Utc::now(),
        summary: Summary::from_matches(&matches),
        groups: group(&matches),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::table::CellValue;

    const CATALOG: &str = r#"[
        {
            "set_isbn": "9789999999991",
            "set_isbn_title": "Collected Works",
            "volume_count": 3,
            "associated_volumes": "9780306406157,9780000000002,9781000000009",
            "volume_titles": "Volume 1 | Volume 2 | Volume 3"
        }
    ]"#;

    fn header(order: &str) -> RawRow {
        RawRow::from_strs(&["Customer", "ACC-1", "", order])
    }

    fn component(isbn: CellValue) -> RawRow {
        let mut cells = vec![CellValue::Empty; 12];
        cells[5] = isbn;
        cells[11] = CellValue::String("VSet".to_string());
        RawRow::new(cells)
    }

    #[test]
    fn test_end_to_end() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        let rows = vec![
            header("55"),
            component(CellValue::String("9780306406157".to_string())),
            component(CellValue::String("97803064x6157".to_string())),
        ];

        let report = search(&rows, &catalog).unwrap();

        assert_eq!(report.summary, Summary { total: 1, found: 1, not_found: 0 });
        assert_eq!(report.groups.found.len(), 1);
        assert_eq!(report.groups.found[0].order_number.as_deref(), Some("55"));
        assert_eq!(report.groups.found[0].matched_isbns, vec!["9780306406157"]);
        assert!(report.groups.not_found.is_empty());
    }

    #[test]
    fn test_mixed_found_and_missing() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        let rows = vec![
            component(CellValue::Float(9780000000002.0)),
            header("8"),
            component(CellValue::String("978-1-00-000000-9".to_string())),
            component(CellValue::String("9780131103627".to_string())),
        ];

        let report = search(&rows, &catalog).unwrap().with_source("orders.xlsx");

        assert_eq!(report.source.as_deref(), Some("orders.xlsx"));
        assert_eq!(report.summary, Summary { total: 3, found: 2, not_found: 1 });
        assert_eq!(report.groups.found.len(), 2);
        assert_eq!(report.groups.found[0].order_number, None);
        assert_eq!(report.groups.not_found[0].isbns, vec!["9780131103627"]);
        assert_eq!(report.groups.not_found[0].key(), "8");
    }

    #[test]
    fn test_no_components_is_empty_report() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        let report = search(&[header("1")], &catalog).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_catalog_not_ready() {
        let rows = vec![component(CellValue::String("9780306406157".to_string()))];
        assert!(matches!(
            search(&rows, &Catalog::default()),
            Err(Error::CatalogNotReady)
        ));
        assert!(matches!(search(&[], &Catalog::default()), Err(Error::CatalogNotReady)));
    }

    #[test]
    fn test_report_serializes() {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        let rows = vec![component(CellValue::String("9780306406157".to_string()))];
        let report = search(&rows, &catalog).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["found"], 1);
        assert_eq!(json["groups"]["found"][0]["set"]["set_isbn"], "9789999999991");
        assert!(json["groups"]["found"][0]["order_number"].is_null());
    }
}
