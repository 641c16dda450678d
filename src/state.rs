//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::store::Store;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState<S: Store> {
    /// Process-wide store, built once at startup
    pub store: S,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

/// Type alias for shared state
pub type SharedState<S> = Arc<AppState<S>>;
