pub mod admin;
pub mod beaches;
pub mod health;

use beach_core::store::BeachStore;

use crate::state::AppState;

/// Run blocking store work off the async executor.
pub(crate) async fn with_store<T, F>(app: &AppState, f: F) -> anyhow::Result<T>
where
    F: FnOnce(&dyn BeachStore) -> beach_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = app.store.clone();
    let result = tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| anyhow::anyhow!("task join error: {e}"))??;
    Ok(result)
}
