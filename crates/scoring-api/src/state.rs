//! # Application State
//!
//! Shared state for the axum application: the immutable auth configuration
//! and the retry-wrapped store client. Cheaply cloneable — clones share
//! the same backend.

use std::sync::Arc;

use scoring_store::{MemoryBackend, Store};

use crate::auth::AuthConfig;

/// Shared application state passed to the method-call route.
#[derive(Clone)]
pub struct AppState {
    /// Authentication constants, threaded in at construction.
    pub auth: AuthConfig,
    /// Store client shared by all requests.
    pub store: Store,
}

impl AppState {
    /// Default state: standard auth constants over an in-memory backend.
    pub fn new() -> Self {
        Self::with_parts(
            AuthConfig::default(),
            Store::new(Arc::new(MemoryBackend::new())),
        )
    }

    /// Assemble state from explicit parts.
    pub fn with_parts(auth: AuthConfig, store: Store) -> Self {
        Self { auth, store }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
