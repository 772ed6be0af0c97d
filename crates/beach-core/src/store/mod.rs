//! Storage backends for beach documents.
//!
//! The store is treated as an opaque document collection addressed by an
//! internal key. The domain identifier (`id`) lives inside each document, so
//! lookups by identifier go through [`BeachStore::read_where`].

pub mod file;
pub mod firebase;
pub mod memory;
pub mod oauth;

use crate::error::Result;
use crate::model::{BeachRecord, StoredBeach};
use serde_json::{Map, Value};

pub use file::FileStore;
pub use firebase::{Credential, FirebaseStore};
pub use memory::MemoryStore;

/// Document store holding the beach collection.
///
/// Implementations are blocking; async callers should go through
/// `spawn_blocking`.
pub trait BeachStore: Send + Sync {
    /// Every entry in the collection, in key order. Empty when the collection
    /// is absent.
    fn read_all(&self) -> Result<Vec<StoredBeach>>;

    /// Entries whose `field` equals `value`.
    fn read_where(&self, field: &str, value: &str) -> Result<Vec<StoredBeach>>;

    /// Replace the whole collection with `records`, keyed by position.
    fn write_all(&self, records: &[BeachRecord]) -> Result<()>;

    /// Merge `fields` into the entry at `key`, leaving other fields untouched.
    fn patch(&self, key: &str, fields: &Map<String, Value>) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Shared document helpers
// ---------------------------------------------------------------------------

/// Flatten a collection snapshot into keyed entries.
///
/// Accepts both shapes a keyed collection comes back in: an object keyed by
/// store key, or an array when the keys are sequential integers (null slots
/// are holes and are skipped). Integer keys sort numerically ahead of others.
pub(crate) fn collect_entries(snapshot: Value) -> Vec<StoredBeach> {
    let mut entries: Vec<StoredBeach> = match snapshot {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| StoredBeach::new(i.to_string(), v))
            .collect(),
        Value::Object(map) => map
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| StoredBeach::new(k, v))
            .collect(),
        _ => Vec::new(),
    };
    entries.sort_by(|a, b| key_order(&a.key).cmp(&key_order(&b.key)));
    entries
}

fn key_order(key: &str) -> (u8, u64, &str) {
    match key.parse::<u64>() {
        Ok(n) => (0, n, key),
        Err(_) => (1, 0, key),
    }
}

/// Positional keyed map for a full-collection write.
pub(crate) fn records_to_map(records: &[BeachRecord]) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for (i, r) in records.iter().enumerate() {
        map.insert(i.to_string(), serde_json::to_value(r)?);
    }
    Ok(map)
}

/// Merge `fields` into `target`. A non-object target is replaced outright.
pub(crate) fn merge_fields(target: &mut Value, fields: &Map<String, Value>) {
    match target {
        Value::Object(existing) => {
            for (k, v) in fields {
                existing.insert(k.clone(), v.clone());
            }
        }
        other => *other = Value::Object(fields.clone()),
    }
}

/// String equality on a document field, matching Firebase's
/// `equalTo="<value>"`: a document stored with `"id": 1` is not found by `"1"`.
pub(crate) fn field_equals(doc: &Value, field: &str, value: &str) -> bool {
    doc.get(field).and_then(Value::as_str) == Some(value)
}
