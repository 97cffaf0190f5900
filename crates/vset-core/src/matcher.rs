//! Set matcher: find the owning set for each extracted component

use crate::catalog::{Catalog, VolumeSet};
use crate::error::{Error, Result};
use crate::scanner::ComponentRecord;
use serde::Serialize;
use tracing::{debug, info};

/// A component and the set it belongs to, if the catalog knows it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord<'a> {
    pub isbn: String,
    pub order_number: Option<String>,
    pub matched_set: Option<&'a VolumeSet>,
}

impl MatchRecord<'_> {
    /// Check if a set was found
    pub fn is_found(&self) -> bool {
        self.matched_set.is_some()
    }
}

/// Look up every component in the catalog
///
/// Fails with [`Error::CatalogNotReady`] when the catalog holds no sets, so
/// that an unloaded catalog is not mistaken for "nothing matched".
pub fn match_all<'a>(
    components: &[ComponentRecord],
    catalog: &'a Catalog,
) -> Result<Vec<MatchRecord<'a>>> {
    if catalog.is_empty() {
        return Err(Error::CatalogNotReady);
    }

    let matches: Vec<MatchRecord<'a>> = components
        .iter()
        .map(|component| {
            let matched_set = catalog.lookup(&component.isbn);
            debug!(
                isbn = %component.isbn,
                set = matched_set.map(|s| s.set_isbn.as_str()).unwrap_or("-"),
                "matched component"
            );
            MatchRecord {
                isbn: component.isbn.clone(),
                order_number: component.order_number.clone(),
                matched_set,
            }
        })
        .collect();

    let found = matches.iter().filter(|m| m.is_found()).count();
    info!(
        components = matches.len(),
        found,
        not_found = matches.len() - found,
        "matched components against catalog"
    );

    Ok(matches)
}
