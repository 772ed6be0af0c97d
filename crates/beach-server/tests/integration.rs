use std::sync::Arc;

use axum::http::StatusCode;
use beach_core::model::{BeachRecord, StoredBeach};
use beach_core::seed::SeedCatalog;
use beach_core::store::{BeachStore, MemoryStore};
use beach_server::state::AppState;
use http_body_util::BodyExt;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A store holding the bundled catalog, seeded the way the server does it.
fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    beach_core::sync::bootstrap(store.as_ref(), &SeedCatalog::bundled().unwrap()).unwrap();
    store
}

fn router(store: Arc<MemoryStore>) -> axum::Router {
    beach_server::build_router(AppState::new(store))
}

/// Send a request via `oneshot` and return (status, parsed JSON body).
async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(serde_json::to_vec(&b).unwrap())),
        None => builder.body(axum::body::Body::empty()),
    }
    .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

async fn put_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "PUT", uri, Some(body)).await
}

/// Store that fails every call, for exercising the 500 paths.
struct BrokenStore;

impl BeachStore for BrokenStore {
    fn read_all(&self) -> beach_core::Result<Vec<StoredBeach>> {
        Err(beach_core::BeachError::Store("upstream unavailable".into()))
    }
    fn read_where(&self, _: &str, _: &str) -> beach_core::Result<Vec<StoredBeach>> {
        Err(beach_core::BeachError::Store("upstream unavailable".into()))
    }
    fn write_all(&self, _: &[BeachRecord]) -> beach_core::Result<()> {
        Err(beach_core::BeachError::Store("upstream unavailable".into()))
    }
    fn patch(&self, _: &str, _: &Map<String, Value>) -> beach_core::Result<()> {
        Err(beach_core::BeachError::Store("upstream unavailable".into()))
    }
}

fn broken_router() -> axum::Router {
    beach_server::build_router(AppState::new(Arc::new(BrokenStore)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_ok() {
    let (status, json) = get(router(Arc::new(MemoryStore::new())), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn list_returns_all_beaches() {
    let (status, json) = get(router(seeded_store()), "/api/beaches").await;

    assert_eq!(status, StatusCode::OK);
    let arr = json.as_array().expect("expected JSON array");
    assert_eq!(arr.len(), 18);
    assert_eq!(arr[0]["name"], "Marina Beach");
}

#[tokio::test]
async fn get_beach_by_id() {
    let (status, json) = get(router(seeded_store()), "/api/beaches/11").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Kovalam Beach");
    assert_eq!(json["oceanCurrents"], "Moderate to Strong");
}

#[tokio::test]
async fn get_unknown_beach_is_404() {
    let (status, json) = get(router(seeded_store()), "/api/beaches/nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Beach not found");
}

#[tokio::test]
async fn search_route_is_not_taken_as_an_id() {
    let (status, json) = get(router(seeded_store()), "/api/beaches/search?query=chennai").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Marina Beach", "Elliot's Beach"]);
}

#[tokio::test]
async fn empty_search_matches_list() {
    let store = seeded_store();
    let (_, all) = get(router(store.clone()), "/api/beaches").await;
    let (status, no_param) = get(router(store.clone()), "/api/beaches/search").await;
    let (_, blank) = get(router(store), "/api/beaches/search?query=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(no_param, all);
    assert_eq!(blank, all);
}

#[tokio::test]
async fn search_with_encoded_space() {
    let (status, json) = get(router(seeded_store()), "/api/beaches/search?query=north%20goa").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn search_query_is_not_trimmed() {
    let (status, json) = get(router(seeded_store()), "/api/beaches/search?query=beach%20").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_rederives_safety() {
    let store = seeded_store();
    let (status, json) = put_json(
        router(store.clone()),
        "/api/beaches/1",
        json!({ "waveHeight": 2.0 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Beach updated successfully");
    assert_eq!(json["beach"]["id"], "1");
    assert_eq!(json["beach"]["isSafe"], false);
    assert_eq!(json["beach"]["name"], "Marina Beach");

    let (_, stored) = get(router(store), "/api/beaches/1").await;
    assert_eq!(stored["isSafe"], false);
    assert_eq!(stored["waveHeight"], 2.0);
}

#[tokio::test]
async fn update_cannot_set_safety_directly() {
    let store = seeded_store();
    let (status, json) = put_json(
        router(store.clone()),
        "/api/beaches/3",
        json!({ "isSafe": true }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["beach"]["isSafe"], false);
    let (_, stored) = get(router(store), "/api/beaches/3").await;
    assert_eq!(stored["isSafe"], false);
}

#[tokio::test]
async fn update_without_body_is_400() {
    let (status, json) = send(router(seeded_store()), "PUT", "/api/beaches/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().starts_with("Invalid request data"));
}

#[tokio::test]
async fn update_with_malformed_json_is_400() {
    let req = axum::http::Request::builder()
        .method("PUT")
        .uri("/api/beaches/1")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{ not json"))
        .unwrap();
    let response = router(seeded_store()).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_unknown_beach_is_404() {
    let (status, _) = put_json(
        router(seeded_store()),
        "/api/beaches/404",
        json!({ "temperature": 20.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sync_check_corrects_then_settles() {
    let store = seeded_store();
    let (status, json) = get(router(store.clone()), "/api/admin/sync-check").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(
        json["message"],
        "Database synchronization complete. Checked 18 beaches, updated 1 safety values."
    );
    let fixed = json["updatedBeaches"].as_array().unwrap();
    assert_eq!(fixed.len(), 1);
    assert_eq!(fixed[0]["id"], "18");
    assert_eq!(fixed[0]["previousSafety"], false);
    assert_eq!(fixed[0]["newSafety"], true);
    assert_eq!(fixed[0]["waveHeight"], 1.4);

    let (_, again) = get(router(store), "/api/admin/sync-check").await;
    assert!(again["updatedBeaches"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn sync_check_on_empty_store_is_404() {
    let (status, json) = get(router(Arc::new(MemoryStore::new())), "/api/admin/sync-check").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "No beaches found in database");
}

#[tokio::test]
async fn store_failures_are_generic_500s() {
    let cases = [
        ("/api/beaches", "Error fetching beaches"),
        ("/api/beaches/1", "Error fetching beach"),
        ("/api/beaches/search?query=goa", "Error searching beaches"),
        ("/api/admin/sync-check", "Error checking database synchronization"),
    ];
    for (uri, message) in cases {
        let (status, json) = get(broken_router(), uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(json["message"], message, "{uri}");
    }

    let (status, json) = put_json(broken_router(), "/api/beaches/1", json!({ "name": "X" })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Error updating beach");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let req = axum::http::Request::builder()
        .uri("/api/beaches")
        .header("origin", "http://10.0.2.2:8081")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = router(seeded_store()).oneshot(req).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
}

#[tokio::test]
async fn bootstrap_task_seeds_empty_store() {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone());
    beach_server::spawn_bootstrap(&state, SeedCatalog::bundled().unwrap())
        .await
        .unwrap();
    assert_eq!(store.read_all().unwrap().len(), 18);

    beach_server::spawn_bootstrap(&state, SeedCatalog::bundled().unwrap())
        .await
        .unwrap();
    assert_eq!(store.write_count(), 1);
}
