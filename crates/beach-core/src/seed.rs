use crate::error::{BeachError, Result};
use crate::model::BeachRecord;
use std::collections::HashSet;
use std::path::Path;

/// Bundled catalog shipped with the binary.
const BUNDLED_CATALOG: &str = include_str!("../data/beaches.json");

/// Immutable bootstrap input for an empty store.
///
/// Identifiers must be unique; both constructors reject a catalog that repeats
/// one, since lookups by id only ever return the first match.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedCatalog {
    records: Vec<BeachRecord>,
}

impl SeedCatalog {
    /// The catalog compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load a catalog from a JSON array on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let records: Vec<BeachRecord> = serde_json::from_str(data)?;
        Self::new(records)
    }

    pub fn new(records: Vec<BeachRecord>) -> Result<Self> {
        let mut seen = HashSet::new();
        for r in &records {
            if r.id.is_empty() {
                return Err(BeachError::Config(format!(
                    "seed record '{}' has an empty id",
                    r.name
                )));
            }
            if !seen.insert(r.id.as_str()) {
                return Err(BeachError::Config(format!(
                    "duplicate seed id '{}'",
                    r.id
                )));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[BeachRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
