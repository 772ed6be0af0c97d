use beach_core::store::BeachStore;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BeachStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BeachStore>) -> Self {
        Self { store }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beach_core::store::MemoryStore;

    #[test]
    fn state_clones_share_store() {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone());
        let copy = state.clone();
        assert_eq!(Arc::strong_count(&store), 3);
        drop(copy);
        assert_eq!(Arc::strong_count(&store), 2);
    }
}
