//! Reference catalog of multi-volume sets
//!
//! The catalog is published as a JSON array in which each set lists its
//! component ISBNs as a comma-delimited string and the matching volume
//! titles as a pipe-delimited string. Both are split once when the catalog
//! is loaded, and an inverted index from component ISBN to owning set is
//! built so that lookups do not rescan the catalog.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Title used for volumes the catalog has no title for
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// A set as it appears in the catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeSetRecord {
    pub set_isbn: String,
    pub set_isbn_title: String,
    #[serde(deserialize_with = "number_or_string")]
    pub volume_count: u32,
    /// Comma-delimited component ISBNs
    pub associated_volumes: String,
    /// Pipe-delimited volume titles, aligned with `associated_volumes`
    #[serde(default)]
    pub volume_titles: String,
}

/// A multi-volume set with its component volumes split out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeSet {
    pub set_isbn: String,
    pub set_title: String,
    pub volume_count: u32,
    /// Component ISBNs in catalog order
    pub associated_volumes: Vec<String>,
    /// Title for each entry of `associated_volumes`, same length
    pub volume_titles: Vec<String>,
}

impl VolumeSet {
    /// Normalize a catalog record
    ///
    /// Missing titles are filled with [`UNKNOWN_TITLE`]; titles beyond the
    /// last volume are dropped.
    pub fn from_record(record: VolumeSetRecord) -> Self {
        let associated_volumes = split_field(&record.associated_volumes, ',');
        let mut volume_titles = split_field(&record.volume_titles, '|');

        if volume_titles.len() > associated_volumes.len() {
            warn!(
                set = %record.set_isbn,
                volumes = associated_volumes.len(),
                titles = volume_titles.len(),
                "set lists more titles than volumes, dropping extras"
            );
        }
        volume_titles.resize(associated_volumes.len(), UNKNOWN_TITLE.to_string());

        Self {
            set_isbn: record.set_isbn,
            set_title: record.set_isbn_title,
            volume_count: record.volume_count,
            associated_volumes,
            volume_titles,
        }
    }

    /// Check whether `isbn` is one of this set's volumes
    pub fn contains(&self, isbn: &str) -> bool {
        self.associated_volumes.iter().any(|v| v == isbn)
    }

    /// Iterate over (isbn, title) pairs for every volume
    pub fn volumes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.associated_volumes
            .iter()
            .zip(&self.volume_titles)
            .map(|(isbn, title)| (isbn.as_str(), title.as_str()))
    }
}

/// All known sets plus an index from component ISBN to owning set
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sets: Vec<VolumeSet>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from normalized sets
    ///
    /// When a component ISBN is listed by more than one set, the set that
    /// comes first keeps it.
    pub fn new(sets: Vec<VolumeSet>) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();

        for (pos, set) in sets.iter().enumerate() {
            for isbn in set.associated_volumes.iter().filter(|v| !v.is_empty()) {
                match index.get(isbn).copied() {
                    Some(owner) if owner != pos => warn!(
                        isbn = %isbn,
                        kept = %sets[owner].set_isbn,
                        ignored = %set.set_isbn,
                        "component listed in more than one set"
                    ),
                    Some(_) => {}
                    None => {
                        index.insert(isbn.clone(), pos);
                    }
                }
            }
        }

        Self { sets, index }
    }

    /// Build a catalog from raw catalog records
    pub fn from_records(records: Vec<VolumeSetRecord>) -> Self {
        Self::new(records.into_iter().map(VolumeSet::from_record).collect())
    }

    /// Parse a catalog from its JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        let records: Vec<VolumeSetRecord> = serde_json::from_str(content)?;
        Ok(Self::from_records(records))
    }

    /// Load a catalog from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let catalog = Self::from_json_str(&content)?;
        info!(
            path = %path.display(),
            sets = catalog.len(),
            volumes = catalog.volume_count(),
            "loaded volume set catalog"
        );
        Ok(catalog)
    }

    /// Find the set a component ISBN belongs to
    pub fn lookup(&self, isbn: &str) -> Option<&VolumeSet> {
        self.index.get(isbn).map(|&pos| &self.sets[pos])
    }

    /// All sets in catalog order
    pub fn sets(&self) -> &[VolumeSet] {
        &self.sets
    }

    /// Get the number of sets
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Check if the catalog holds no sets
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Number of distinct component ISBNs across all sets
    pub fn volume_count(&self) -> usize {
        self.index.len()
    }
}

/// Split a delimited catalog field into trimmed tokens, keeping positions
fn split_field(field: &str, delimiter: char) -> Vec<String> {
    if field.trim().is_empty() {
        return Vec::new();
    }
    field.split(delimiter).map(|s| s.trim().to_string()).collect()
}

fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u32),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
