use axum::Json;

/// GET /api/health: liveness check; does not touch the store.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
