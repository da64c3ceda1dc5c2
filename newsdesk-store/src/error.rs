//! Store error types.

use thiserror::Error;

/// Errors that can occur in a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing store unreachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
