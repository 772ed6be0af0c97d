//! Seeding an empty store and correcting stale safety flags.

use crate::error::{BeachError, Result};
use crate::model::StoredBeach;
use crate::safety;
use crate::seed::SeedCatalog;
use crate::store::BeachStore;
use serde::Serialize;
use serde_json::{json, Map, Value};

// ---------------------------------------------------------------------------
// Bootstrap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BootstrapOutcome {
    /// The store was empty and the catalog was written.
    Seeded { count: usize },
    /// The store already held data; nothing was written.
    AlreadyPopulated { count: usize },
}

/// Populate an empty store from `seed`.
///
/// Seed records are written verbatim, including their pre-set `isSafe`. A store
/// that already holds any entry is left untouched. The emptiness check and the
/// write are not atomic.
pub fn bootstrap(store: &dyn BeachStore, seed: &SeedCatalog) -> Result<BootstrapOutcome> {
    let existing = store.read_all()?;
    if !existing.is_empty() {
        tracing::info!(count = existing.len(), "beach data already present in store");
        return Ok(BootstrapOutcome::AlreadyPopulated {
            count: existing.len(),
        });
    }

    tracing::info!(count = seed.len(), "seeding empty store with beach catalog");
    store.write_all(seed.records())?;
    Ok(BootstrapOutcome::Seeded { count: seed.len() })
}

// ---------------------------------------------------------------------------
// Reconcile
// ---------------------------------------------------------------------------

/// One corrected safety flag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyCorrection {
    pub id: String,
    pub name: String,
    /// `None` when the stored document had no flag at all.
    pub previous_safety: Option<bool>,
    pub new_safety: bool,
    pub wave_height: f64,
    pub ocean_currents: String,
}

/// Summary of a reconcile pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub checked: usize,
    pub updated: usize,
    /// Store keys of entries skipped for missing id, name, wave height, or currents.
    pub invalid: Vec<String>,
    pub updated_beaches: Vec<SafetyCorrection>,
}

impl SyncReport {
    pub fn message(&self) -> String {
        format!(
            "Database synchronization complete. Checked {} beaches, updated {} safety values.",
            self.checked, self.updated
        )
    }

    /// Response body for the sync-check endpoint.
    pub fn to_response(&self) -> Value {
        json!({
            "success": true,
            "message": self.message(),
            "updatedBeaches": self.updated_beaches,
        })
    }
}

/// Work out the correction an entry needs, if any. Returns `Err(())` for an
/// entry that is missing the fields the check depends on.
fn plan_correction(entry: &StoredBeach) -> std::result::Result<Option<SafetyCorrection>, ()> {
    let (Some(id), Some(name), Some(wave_height), Some(currents)) = (
        entry.id(),
        entry.name(),
        entry.wave_height(),
        entry.ocean_currents(),
    ) else {
        return Err(());
    };

    let expected = safety::evaluate(wave_height, currents);
    let stored = entry.is_safe();
    if stored == Some(expected) {
        return Ok(None);
    }
    Ok(Some(SafetyCorrection {
        id,
        name: name.to_string(),
        previous_safety: stored,
        new_safety: expected,
        wave_height,
        ocean_currents: currents.to_string(),
    }))
}

/// Upper bound on threads issuing correction writes during one pass.
pub const MAX_CORRECTION_WORKERS: usize = 8;

/// Split `planned` into at most `max_workers` batches, each written by one
/// scoped thread. Every write is attempted; the first failure is returned
/// after all threads have joined.
fn apply_corrections(
    store: &dyn BeachStore,
    planned: &[(String, SafetyCorrection)],
    max_workers: usize,
) -> Result<()> {
    if planned.is_empty() {
        return Ok(());
    }
    let workers = max_workers.clamp(1, planned.len());
    let batch_size = planned.len().div_ceil(workers);

    let results: Vec<Result<()>> = std::thread::scope(|s| {
        let mut handles = Vec::with_capacity(workers);
        for batch in planned.chunks(batch_size) {
            let spawned = std::thread::Builder::new()
                .name("beach-sync".into())
                .spawn_scoped(s, move || write_batch(store, batch));
            match spawned {
                Ok(handle) => handles.push(handle),
                // Workers already started are still joined by the scope.
                Err(e) => return vec![Err(BeachError::Io(e))],
            }
        }
        handles
            .into_iter()
            .map(|h| {
                h.join()
                    .unwrap_or_else(|_| Err(BeachError::Store("correction write panicked".into())))
            })
            .collect()
    });
    results.into_iter().collect()
}

fn write_batch(store: &dyn BeachStore, batch: &[(String, SafetyCorrection)]) -> Result<()> {
    let mut outcome = Ok(());
    for (key, c) in batch {
        tracing::info!(
            id = %c.id,
            name = %c.name,
            from = ?c.previous_safety,
            to = c.new_safety,
            "correcting beach safety"
        );
        let mut fields = Map::new();
        fields.insert("isSafe".to_string(), Value::Bool(c.new_safety));
        if let Err(e) = store.patch(key, &fields) {
            tracing::error!(key = %key, "correction write failed: {e}");
            if outcome.is_ok() {
                outcome = Err(e);
            }
        }
    }
    outcome
}

/// Recompute every stored safety flag and patch the ones that disagree.
///
/// Correction writes touch only `isSafe` and are issued in parallel on at most
/// [`MAX_CORRECTION_WORKERS`] threads; the report is built once every write has
/// finished. If any write fails the pass fails, though the writes that
/// succeeded stay applied.
pub fn reconcile_all(store: &dyn BeachStore) -> Result<SyncReport> {
    reconcile_with_workers(store, MAX_CORRECTION_WORKERS)
}

/// [`reconcile_all`] with an explicit cap on concurrent correction writes.
pub fn reconcile_with_workers(store: &dyn BeachStore, max_workers: usize) -> Result<SyncReport> {
    tracing::info!("starting safety synchronization check");
    let entries = store.read_all()?;
    if entries.is_empty() {
        return Err(BeachError::EmptyStore);
    }

    let mut invalid = Vec::new();
    let mut planned: Vec<(String, SafetyCorrection)> = Vec::new();
    for entry in &entries {
        match plan_correction(entry) {
            Ok(Some(c)) => planned.push((entry.key.clone(), c)),
            Ok(None) => {}
            Err(()) => {
                tracing::warn!(key = %entry.key, data = %entry.data, "skipping beach with invalid data");
                invalid.push(entry.key.clone());
            }
        }
    }

    apply_corrections(store, &planned, max_workers)?;

    let updated_beaches: Vec<SafetyCorrection> = planned.into_iter().map(|(_, c)| c).collect();
    let report = SyncReport {
        checked: entries.len(),
        updated: updated_beaches.len(),
        invalid,
        updated_beaches,
    };
    tracing::info!(
        checked = report.checked,
        updated = report.updated,
        invalid = report.invalid.len(),
        "safety synchronization complete"
    );
    Ok(report)
}
