//! # Store Backend Seam
//!
//! The trait a concrete key-value backend implements, plus its error
//! taxonomy. The retry policy in [`crate::client`] keys off
//! [`BackendError::is_transient`]: connectivity failures are retryable,
//! everything else is not.

use thiserror::Error;

/// Errors a backend operation can produce.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be reached or the connection dropped mid
    /// operation. Retryable.
    #[error("backend connection failed: {reason}")]
    Connection {
        /// Human-readable transport diagnostic.
        reason: String,
    },

    /// The backend rejected the operation itself (bad key, oversized
    /// value, protocol violation). Never retried.
    #[error("backend rejected operation: {0}")]
    Invalid(String),
}

impl BackendError {
    /// Convenience constructor for connectivity failures.
    pub fn connection(reason: impl Into<String>) -> Self {
        Self::Connection {
            reason: reason.into(),
        }
    }

    /// True when retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// A key-value backend connection.
///
/// Implementations are shared long-lived resources reused across
/// operations, so they must be safe to call from parallel requests.
pub trait StoreBackend: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Store `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;
}
