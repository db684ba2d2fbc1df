//! Error types for the persistence layer.

use confab_core::error::ConfabError;

/// Errors from the record store or the vault.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
    #[error("crypto error: {0}")]
    Crypto(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<StoreError> for ConfabError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Crypto(msg) => ConfabError::Crypto(msg),
            StoreError::Serialization(msg) => ConfabError::Serialization(msg),
            StoreError::Backend(msg) | StoreError::LockPoisoned(msg) => ConfabError::Storage(msg),
        }
    }
}
