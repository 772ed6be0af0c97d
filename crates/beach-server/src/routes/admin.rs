use anyhow::Context;
use axum::extract::State;
use axum::Json;

use super::with_store;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/admin/sync-check: recompute every safety flag and fix stale ones.
pub async fn sync_check(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let report = with_store(&app, beach_core::sync::reconcile_all)
        .await
        .context("Error checking database synchronization")?;
    Ok(Json(report.to_response()))
}
