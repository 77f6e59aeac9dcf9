// Application state module
// Shared by every connection task for the lifetime of the server

use std::sync::Arc;

use super::types::Config;
use crate::store::DocumentStore;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Injected at startup; handlers never reach storage any other way
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }
}
