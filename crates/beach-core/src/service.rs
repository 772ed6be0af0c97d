//! Read and update operations behind the beach API.

use crate::error::{BeachError, Result};
use crate::model::{BeachPatch, StoredBeach};
use crate::safety;
use crate::store::BeachStore;
use serde_json::{Map, Value};

pub const UPDATE_MESSAGE: &str = "Beach updated successfully";

/// Every stored document, verbatim, in store order.
pub fn list_all(store: &dyn BeachStore) -> Result<Vec<Value>> {
    Ok(store.read_all()?.into_iter().map(|e| e.data).collect())
}

/// Look up the entry whose `id` field equals `id`.
///
/// Identifiers are assumed unique. If the store returns several matches the
/// first one wins and the duplicate is logged.
pub fn find_by_id(store: &dyn BeachStore, id: &str) -> Result<StoredBeach> {
    let mut hits = store.read_where("id", id)?.into_iter();
    let first = hits
        .next()
        .ok_or_else(|| BeachError::BeachNotFound(id.to_string()))?;
    let extra = hits.count();
    if extra > 0 {
        tracing::warn!(id, duplicates = extra, "beach id is not unique; using first match");
    }
    Ok(first)
}

pub fn get_by_id(store: &dyn BeachStore, id: &str) -> Result<Value> {
    Ok(find_by_id(store, id)?.data)
}

/// Case-insensitive substring match on name or location. A missing or empty
/// query returns everything; any other query is matched exactly as given,
/// surrounding whitespace included.
pub fn search(store: &dyn BeachStore, query: Option<&str>) -> Result<Vec<Value>> {
    let needle = match query {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return list_all(store),
    };
    let matches = |field: Option<&str>| field.is_some_and(|v| v.to_lowercase().contains(&needle));

    Ok(store
        .read_all()?
        .into_iter()
        .filter(|e| matches(e.name()) || matches(e.location()))
        .map(|e| e.data)
        .collect())
}

/// Apply a partial update to the beach with identifier `id`.
///
/// When the patch changes `waveHeight` or `oceanCurrents`, `isSafe` is
/// re-derived from the effective values (patched, else stored). Otherwise any
/// caller-supplied `isSafe` is dropped; the flag is never set directly.
///
/// Returns the merged view (stored fields, then patch, then `id`) built here
/// rather than re-read, so a concurrent write by another caller may be missing
/// from it.
pub fn update(store: &dyn BeachStore, id: &str, patch: Option<BeachPatch>) -> Result<Value> {
    if id.trim().is_empty() {
        return Err(BeachError::BadRequest("missing beach id".into()));
    }
    let mut patch = patch.ok_or_else(|| BeachError::BadRequest("missing update body".into()))?;

    let current = find_by_id(store, id)?;

    if patch.touches_conditions() {
        let wave_height = patch.wave_height.or_else(|| current.wave_height());
        let currents = patch.ocean_currents.clone().or_else(|| {
            current
                .data
                .get("oceanCurrents")
                .and_then(Value::as_str)
                .map(str::to_string)
        });
        let (Some(wave_height), Some(currents)) = (wave_height, currents) else {
            return Err(BeachError::BadRequest(format!(
                "beach {id} has no wave height or ocean currents to evaluate"
            )));
        };
        let is_safe = safety::evaluate(wave_height, &currents);
        tracing::info!(id, is_safe, "beach safety re-derived");
        patch.is_safe = Some(is_safe);
    } else if patch.is_safe.take().is_some() {
        tracing::debug!(id, "ignoring caller-supplied isSafe");
    }

    let fields = patch.to_fields();
    if fields.is_empty() {
        tracing::debug!(id, "empty patch; nothing written");
    } else {
        store.patch(&current.key, &fields)?;
    }

    let mut merged = match current.data {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merged.extend(fields);
    merged.insert("id".to_string(), Value::String(id.to_string()));
    Ok(Value::Object(merged))
}
