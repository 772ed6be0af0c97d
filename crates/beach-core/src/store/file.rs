use super::{collect_entries, field_equals, merge_fields, records_to_map, BeachStore};
use crate::error::{BeachError, Result};
use crate::io;
use crate::model::{BeachRecord, StoredBeach};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Single JSON document on disk, rewritten atomically on every write.
///
/// Meant for local development without a hosted database. The document has the
/// same shape as the hosted collection so a Firebase export can be dropped in.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Value> {
        match io::read_if_exists(&self.path)? {
            Some(s) if !s.trim().is_empty() => Ok(serde_json::from_str(&s)?),
            _ => Ok(Value::Null),
        }
    }

    fn save(&self, snapshot: &Value) -> Result<()> {
        let data = serde_json::to_vec_pretty(snapshot)?;
        io::atomic_write(&self.path, &data)
    }

    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let _held = self
            .guard
            .lock()
            .map_err(|_| BeachError::Store("file store lock poisoned".into()))?;
        f()
    }
}

impl BeachStore for FileStore {
    fn read_all(&self) -> Result<Vec<StoredBeach>> {
        self.with_lock(|| Ok(collect_entries(self.load()?)))
    }

    fn read_where(&self, field: &str, value: &str) -> Result<Vec<StoredBeach>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| field_equals(&e.data, field, value))
            .collect())
    }

    fn write_all(&self, records: &[BeachRecord]) -> Result<()> {
        self.with_lock(|| self.save(&Value::Object(records_to_map(records)?)))
    }

    fn patch(&self, key: &str, fields: &Map<String, Value>) -> Result<()> {
        self.with_lock(|| {
            // Normalise to the keyed form so array snapshots patch by index.
            let mut docs: Map<String, Value> = collect_entries(self.load()?)
                .into_iter()
                .map(|e| (e.key, e.data))
                .collect();
            let doc = docs
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            merge_fields(doc, fields);
            self.save(&Value::Object(docs))
        })
    }
}
