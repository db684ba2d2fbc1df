//! Error types for the dispatch pipeline.

use confab_core::error::ConfabError;
use confab_store::StoreError;

/// Errors from the turn-handling pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("classifier error: {0}")]
    Classifier(String),
    #[error("responder error: {0}")]
    Responder(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("session error: {0}")]
    Session(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::Serialization(err.to_string())
    }
}

impl From<ConfabError> for DispatchError {
    fn from(err: ConfabError) -> Self {
        match err {
            ConfabError::Classifier(msg) => DispatchError::Classifier(msg),
            ConfabError::Responder(msg) => DispatchError::Responder(msg),
            ConfabError::Session(msg) => DispatchError::Session(msg),
            ConfabError::Serialization(msg) => DispatchError::Serialization(msg),
            other => DispatchError::Store(StoreError::Backend(other.to_string())),
        }
    }
}
