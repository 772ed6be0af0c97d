use anyhow::Context;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::Json;
use beach_core::{service, BeachPatch};

use super::with_store;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/beaches: every stored beach.
pub async fn list_beaches(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let beaches = with_store(&app, service::list_all)
        .await
        .context("Error fetching beaches")?;
    Ok(Json(serde_json::json!(beaches)))
}

/// GET /api/beaches/:id: one beach by its identifier.
pub async fn get_beach(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let beach = with_store(&app, move |store| service::get_by_id(store, &id))
        .await
        .context("Error fetching beach")?;
    Ok(Json(beach))
}

#[derive(serde::Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

/// GET /api/beaches/search?query=<text>
pub async fn search_beaches(
    State(app): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let beaches = with_store(&app, move |store| {
        service::search(store, params.query.as_deref())
    })
    .await
    .context("Error searching beaches")?;
    Ok(Json(serde_json::json!(beaches)))
}

/// Decode an update body. An empty body or JSON `null` is a missing patch,
/// which the service rejects.
fn parse_patch(body: &Bytes) -> Result<Option<BeachPatch>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| AppError::bad_request(format!("body is not valid JSON: {e}")))?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| AppError::bad_request(format!("invalid beach fields: {e}"))),
        _ => Err(AppError::bad_request("body must be a JSON object")),
    }
}

/// PUT /api/beaches/:id: partial update; re-derives safety when conditions change.
pub async fn update_beach(
    State(app): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let patch = parse_patch(&body)?;
    let beach = with_store(&app, move |store| service::update(store, &id, patch))
        .await
        .context("Error updating beach")?;
    Ok(Json(serde_json::json!({
        "message": service::UPDATE_MESSAGE,
        "beach": beach,
    })))
}
