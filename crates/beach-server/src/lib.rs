pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use beach_core::seed::SeedCatalog;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        // Beaches
        .route("/api/beaches", get(routes::beaches::list_beaches))
        .route(
            "/api/beaches/search",
            get(routes::beaches::search_beaches),
        )
        .route(
            "/api/beaches/{id}",
            get(routes::beaches::get_beach).put(routes::beaches::update_beach),
        )
        // Admin
        .route("/api/admin/sync-check", get(routes::admin::sync_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Seed the store in the background if it is empty.
///
/// Requests are served while this runs. Failures are logged and the server
/// keeps running against whatever the store holds.
pub fn spawn_bootstrap(app_state: &AppState, seed: SeedCatalog) -> tokio::task::JoinHandle<()> {
    let store = app_state.store.clone();
    tokio::task::spawn_blocking(move || {
        match beach_core::sync::bootstrap(store.as_ref(), &seed) {
            Ok(outcome) => tracing::info!(?outcome, "beach data bootstrap finished"),
            Err(e) => tracing::error!("error syncing beach data to store: {e}"),
        }
    })
}

/// Start the API server on `port`, seeding the store from `seed` when given.
pub async fn serve(app_state: AppState, seed: Option<SeedCatalog>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, seed, listener).await
}

/// Start the API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    app_state: AppState,
    seed: Option<SeedCatalog>,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(app_state.clone());

    tracing::info!("BeachSafe API listening on http://localhost:{actual_port}/api");

    if let Some(seed) = seed {
        spawn_bootstrap(&app_state, seed);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
