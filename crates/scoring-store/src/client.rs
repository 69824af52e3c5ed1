//! # Retry-Wrapped Store Client
//!
//! [`Store`] runs each backend operation in a bounded retry loop. Exactly
//! [`MAX_RETRIES`] underlying attempts are made when every attempt fails
//! with a transient error; non-transient errors end the loop immediately.
//! No backoff delay between attempts — the backend's own timeouts pace the
//! loop.

use std::sync::Arc;

use thiserror::Error;

use crate::backend::{BackendError, StoreBackend};

/// Maximum number of underlying attempts per operation. Process-wide.
pub const MAX_RETRIES: u32 = 3;

/// A cache write that did not succeed.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The retry budget was exhausted on transient failures; `attempts`
    /// underlying calls were made.
    #[error("store unreachable after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: BackendError,
    },

    /// The backend rejected the operation; no retry was attempted.
    #[error(transparent)]
    Rejected(BackendError),
}

/// Retry-wrapped client over a shared backend connection.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn StoreBackend>,
    max_retries: u32,
}

impl Store {
    /// Wrap a backend with the process-wide retry budget.
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self {
            backend,
            max_retries: MAX_RETRIES,
        }
    }

    /// Wrap a backend with an explicit retry budget. `max_retries` is the
    /// total number of underlying attempts and must be positive.
    pub fn with_retries(backend: Arc<dyn StoreBackend>, max_retries: u32) -> Self {
        debug_assert!(max_retries > 0, "retry budget must be positive");
        Self {
            backend,
            max_retries: max_retries.max(1),
        }
    }

    /// Read a cached value. Soft failure semantics.
    ///
    /// Returns `None` both for a genuine cache miss and for a backend that
    /// stayed unreachable through the whole retry budget. Callers cannot
    /// distinguish the two — a deliberate limitation of the read path; use
    /// [`Store::cache_set`] when failure must be observable.
    pub fn cache_get(&self, key: &str) -> Option<String> {
        match self.run_with_retry(|| self.backend.get(key)) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read degraded to absent");
                None
            }
        }
    }

    /// Write a cached value. Hard failure semantics.
    ///
    /// Transient errors inside the retry budget are transparent; once the
    /// budget is spent (or the backend rejects the write) the failure is
    /// returned to the caller. `Ok` is reported only when the underlying
    /// write actually completed.
    pub fn cache_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.run_with_retry(|| self.backend.set(key, value))
    }

    /// Run `op` up to `max_retries` times, retrying only transient errors.
    fn run_with_retry<T>(
        &self,
        op: impl Fn() -> Result<T, BackendError>,
    ) -> Result<T, StoreError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        error = %e,
                        "transient store failure, retrying"
                    );
                }
                Err(e) if e.is_transient() => {
                    return Err(StoreError::Exhausted {
                        attempts: attempt,
                        last: e,
                    });
                }
                Err(e) => return Err(StoreError::Rejected(e)),
            }
        }
    }
}
