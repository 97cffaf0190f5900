//! Result grouper: collapse match records into per-set and per-order groups

use crate::catalog::VolumeSet;
use crate::matcher::MatchRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Group key used for components listed before any order header
pub const NO_ORDER: &str = "none";

/// Components of one set found under one order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoundGroup<'a> {
    pub set: &'a VolumeSet,
    pub order_number: Option<String>,
    /// Searched ISBNs that belong to `set`, first-seen order, no repeats
    pub matched_isbns: Vec<String>,
}

impl FoundGroup<'_> {
    /// Key identifying this group: (set ISBN, order number or [`NO_ORDER`])
    pub fn key(&self) -> (String, String) {
        (self.set.set_isbn.clone(), order_key(self.order_number.as_deref()).to_string())
    }

    /// Check if `isbn` was one of the searched components
    pub fn is_matched(&self, isbn: &str) -> bool {
        self.matched_isbns.iter().any(|m| m == isbn)
    }

    /// Every volume of the set, with the searched ones highlighted
    pub fn volume_rows(&self) -> Vec<VolumeRow<'_>> {
        self.set
            .volumes()
            .map(|(isbn, title)| VolumeRow {
                isbn,
                title,
                highlighted: self.is_matched(isbn),
            })
            .collect()
    }
}

/// One line of a set's volume listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeRow<'a> {
    pub isbn: &'a str,
    pub title: &'a str,
    pub highlighted: bool,
}

/// Components no set was found for, under one order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotFoundGroup {
    pub order_number: Option<String>,
    pub isbns: Vec<String>,
}

impl NotFoundGroup {
    /// Order number or [`NO_ORDER`]
    pub fn key(&self) -> &str {
        order_key(self.order_number.as_deref())
    }
}

/// Match results grouped for reporting
///
/// Both lists keep the order in which each group was first encountered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupedReport<'a> {
    pub found: Vec<FoundGroup<'a>>,
    pub not_found: Vec<NotFoundGroup>,
}

impl<'a> GroupedReport<'a> {
    /// Find a found-set group by set ISBN and order
    pub fn find_group(&self, set_isbn: &str, order_number: Option<&str>) -> Option<&FoundGroup<'a>> {
        let order = order_key(order_number);
        self.found
            .iter()
            .find(|g| g.set.set_isbn == set_isbn && order_key(g.order_number.as_deref()) == order)
    }

    /// Number of searched components that matched a set
    pub fn found_count(&self) -> usize {
        self.found.iter().map(|g| g.matched_isbns.len()).sum()
    }

    /// Number of searched components without a set
    pub fn not_found_count(&self) -> usize {
        self.not_found.iter().map(|g| g.isbns.len()).sum()
    }
}

/// Group match records by (set, order) and unmatched ones by order
pub fn group<'a>(matches: &[MatchRecord<'a>]) -> GroupedReport<'a> {
    let mut report = GroupedReport::default();
    let mut found_index: HashMap<(String, String), usize> = HashMap::new();
    let mut missing_index: HashMap<String, usize> = HashMap::new();

    for record in matches {
        let order = order_key(record.order_number.as_deref()).to_string();

        match record.matched_set {
            Some(set) => {
                let pos = *found_index
                    .entry((set.set_isbn.clone(), order))
                    .or_insert_with(|| {
                        report.found.push(FoundGroup {
                            set,
                            order_number: record.order_number.clone(),
                            matched_isbns: Vec::new(),
                        });
                        report.found.len() - 1
                    });

                let found = &mut report.found[pos];
                if !found.is_matched(&record.isbn) {
                    found.matched_isbns.push(record.isbn.clone());
                }
            }
            None => {
                let pos = *missing_index.entry(order).or_insert_with(|| {
                    report.not_found.push(NotFoundGroup {
                        order_number: record.order_number.clone(),
                        isbns: Vec::new(),
                    });
                    report.not_found.len() - 1
                });

                report.not_found[pos].isbns.push(record.isbn.clone());
            }
        }
    }

    report
}

fn order_key(order_number: Option<&str>) -> &str {
    order_number.unwrap_or(NO_ORDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VolumeSetRecord;

    fn set(set_isbn: &str, volumes: &str, titles: &str) -> VolumeSet {
        VolumeSet::from_record(VolumeSetRecord {
            set_isbn: set_isbn.to_string(),
            set_isbn_title: format!("Set {}", set_isbn),
            volume_count: 3,
            associated_volumes: volumes.to_string(),
            volume_titles: titles.to_string(),
        })
    }

    fn record<'a>(isbn: &str, order: Option<&str>, set: Option<&'a VolumeSet>) -> MatchRecord<'a> {
        MatchRecord {
            isbn: isbn.to_string(),
            order_number: order.map(str::to_string),
            matched_set: set,
        }
    }

    #[test]
    fn test_same_set_and_order_collapse() {
        let s1 = set("SET1", "A,B,C", "Alpha | Beta | Gamma");
        let matches = vec![record("B", Some("7"), Some(&s1)), record("A", Some("7"), Some(&s1))];

        let report = group(&matches);

        assert_eq!(report.found.len(), 1);
        assert_eq!(report.found[0].matched_isbns, vec!["B", "A"]);
        assert_eq!(report.found[0].key(), ("SET1".to_string(), "7".to_string()));
        assert!(report.not_found.is_empty());
    }

    #[test]
    fn test_groups_split_by_order() {
        let s1 = set("SET1", "A,B", "");
        let s2 = set("SET2", "C", "");
        let matches = vec![
            record("A", Some("1"), Some(&s1)),
            record("C", None, Some(&s2)),
            record("B", Some("2"), Some(&s1)),
            record("B", Some("1"), Some(&s1)),
        ];

        let report = group(&matches);
        let keys: Vec<_> = report.found.iter().map(|g| g.key()).collect();

        assert_eq!(
            keys,
            vec![
                ("SET1".to_string(), "1".to_string()),
                ("SET2".to_string(), "none".to_string()),
                ("SET1".to_string(), "2".to_string()),
            ]
        );
        assert_eq!(report.find_group("SET1", Some("1")).unwrap().matched_isbns, vec!["A", "B"]);
        assert!(report.find_group("SET2", None).is_some());
        assert_eq!(report.found_count(), 4);
    }

    #[test]
    fn test_not_found_grouped_by_order() {
        let matches = vec![
            record("X", Some("9"), None),
            record("Y", None, None),
            record("Z", Some("9"), None),
        ];

        let report = group(&matches);

        assert!(report.found.is_empty());
        assert_eq!(
            report.not_found,
            vec![
                NotFoundGroup { order_number: Some("9".to_string()), isbns: vec!["X".to_string(), "Z".to_string()] },
                NotFoundGroup { order_number: None, isbns: vec!["Y".to_string()] },
            ]
        );
        assert_eq!(report.not_found[1].key(), NO_ORDER);
        assert_eq!(report.not_found_count(), 3);
    }

    #[test]
    fn test_volume_rows_highlight_searched_isbns() {
        let s1 = set("SET1", "A,B,C", "Alpha | Beta");
        let report = group(&[record("B", None, Some(&s1))]);

        let rows = report.found[0].volume_rows();
        assert_eq!(
            rows,
            vec![
                VolumeRow { isbn: "A", title: "Alpha", highlighted: false },
                VolumeRow { isbn: "B", title: "Beta", highlighted: true },
                VolumeRow { isbn: "C", title: "Unknown Title", highlighted: false },
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let report = group(&[]);
        assert!(report.found.is_empty());
        assert!(report.not_found.is_empty());
    }
}
