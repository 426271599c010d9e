//! Shared application state.

use std::sync::Arc;

use crate::auth::AuthGate;
use crate::config::AppConfig;
use crate::store::TodoStore;

/// State shared by every handler: the store, the auth gate, and the
/// application configuration. Generic over the store implementation;
/// dependencies are injected at construction.
pub struct AppState<S: TodoStore> {
    store: Arc<S>,
    auth: Arc<AuthGate>,
    config: Arc<AppConfig>,
}

// Manual Clone - only the Arcs are cloned, S itself need not be Clone.
impl<S: TodoStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            auth: Arc::clone(&self.auth),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: TodoStore> AppState<S> {
    pub fn new(store: S, auth: AuthGate, config: AppConfig) -> Self {
        Self {
            store: Arc::new(store),
            auth: Arc::new(auth),
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Cloned Arc for services that outlive a single request.
    pub fn store_arc(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    pub fn auth_arc(&self) -> Arc<AuthGate> {
        Arc::clone(&self.auth)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
