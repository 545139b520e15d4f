use thiserror::Error;

/// Backend-agnostic storage failures.
///
/// `NotFound` and `Duplicate` are part of the ledger's control flow (the
/// controller branches on them); the rest are surfaced to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
