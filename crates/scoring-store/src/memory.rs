//! In-memory storage backend using DashMap.
//!
//! Always connected: operations never produce a transient error. Used as
//! the default backend in development and tests; a production deployment
//! substitutes a networked [`StoreBackend`] implementation.

use std::sync::Arc;

use dashmap::DashMap;

use crate::backend::{BackendError, StoreBackend};

/// In-process key-value backend.
///
/// Cheaply cloneable via `Arc` — all clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries. Test and diagnostics helper.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StoreBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let backend = MemoryBackend::new();
        backend.set("k", "v").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn get_of_absent_key_is_none() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get("missing").unwrap(), None);
    }

    #[test]
    fn set_overwrites_previous_value() {
        let backend = MemoryBackend::new();
        backend.set("k", "old").unwrap();
        backend.set("k", "new").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("new"));
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn clones_share_data() {
        let backend = MemoryBackend::new();
        let other = backend.clone();
        backend.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap().as_deref(), Some("v"));
    }
}
