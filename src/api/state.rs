//! API server state

use std::sync::Arc;

use crate::store::TodoStore;

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Shared store handle, opened once at startup
    pub store: Arc<TodoStore>,
}

impl AppState {
    pub fn new(store: Arc<TodoStore>) -> Self {
        Self { store }
    }
}
