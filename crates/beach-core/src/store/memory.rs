use super::{collect_entries, field_equals, merge_fields, records_to_map, BeachStore};
use crate::error::{BeachError, Result};
use crate::model::{BeachRecord, StoredBeach};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// In-process store. Counts writes so callers can assert on side effects.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<Map<String, Value>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with raw documents. Does not count as a write.
    pub fn with_entries(entries: impl IntoIterator<Item = StoredBeach>) -> Self {
        let docs = entries.into_iter().map(|e| (e.key, e.data)).collect();
        Self {
            docs: Mutex::new(docs),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `write_all` and `patch` calls that reached the store.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Raw document at `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().ok()?.get(key).cloned()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Map<String, Value>>> {
        self.docs
            .lock()
            .map_err(|_| BeachError::Store("memory store lock poisoned".into()))
    }
}

impl BeachStore for MemoryStore {
    fn read_all(&self) -> Result<Vec<StoredBeach>> {
        let docs = self.lock()?.clone();
        Ok(collect_entries(Value::Object(docs)))
    }

    fn read_where(&self, field: &str, value: &str) -> Result<Vec<StoredBeach>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| field_equals(&e.data, field, value))
            .collect())
    }

    fn write_all(&self, records: &[BeachRecord]) -> Result<()> {
        let map = records_to_map(records)?;
        *self.lock()? = map;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn patch(&self, key: &str, fields: &Map<String, Value>) -> Result<()> {
        let mut docs = self.lock()?;
        let doc = docs
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        merge_fields(doc, fields);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
