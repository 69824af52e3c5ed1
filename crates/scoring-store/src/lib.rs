//! # scoring-store — Resilient Key-Value Store Client
//!
//! Wraps an unreliable key-value backend behind a bounded retry loop with
//! differentiated failure semantics:
//!
//! - **cache reads** degrade softly — after the retry budget is spent the
//!   caller sees an absent value, identical to a cache miss;
//! - **cache writes** fail hard — retry exhaustion is surfaced as an
//!   explicit error the caller must handle.
//!
//! Only transient connectivity failures are retried; anything else from the
//! backend returns immediately.
//!
//! ## Components
//!
//! - [`StoreBackend`] — the seam a concrete backend implements.
//! - [`MemoryBackend`] — in-process dashmap backend, always connected.
//! - [`Store`] — the retry-wrapped client handlers consume.

pub mod backend;
pub mod client;
pub mod memory;

pub use backend::{BackendError, StoreBackend};
pub use client::{Store, StoreError, MAX_RETRIES};
pub use memory::MemoryBackend;
