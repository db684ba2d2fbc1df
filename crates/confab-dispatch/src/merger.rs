//! Summary merging.
//!
//! The summary collection holds sealed blobs, so there is no index on the
//! user identity inside them. Upserting therefore scans the full snapshot,
//! opening each document until the identity matches, and overwrites in
//! place; only when no document matches does it insert. Cost is one vault
//! open per persisted summary, once per session termination.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use confab_core::types::SummaryAggregate;
use confab_store::{RecordStore, Vault};

use crate::error::DispatchError;

/// Merges session summaries into the store by decrypted user identity.
///
/// Upserts for the same user are serialized through a per-user lock, so two
/// racing terminations cannot both decide "insert new" and break the
/// at-most-one-summary-per-user invariant.
pub struct SummaryMerger {
    store: Arc<dyn RecordStore>,
    vault: Arc<Vault>,
    collection: String,
    user_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SummaryMerger {
    pub fn new(store: Arc<dyn RecordStore>, vault: Arc<Vault>, collection: String) -> Self {
        Self {
            store,
            vault,
            collection,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Insert the aggregate, or overwrite the user's existing summary.
    ///
    /// The whole fetch-scan-write sequence runs under the user's lock. A
    /// document that fails to open aborts the upsert; the collection is
    /// expected to contain only summaries sealed under the same secret.
    pub async fn upsert(&self, aggregate: &SummaryAggregate) -> Result<(), DispatchError> {
        let lock = self.user_lock(&aggregate.user_id)?;
        let _serialized = lock.lock().await;

        let sealed = self.vault.seal(aggregate)?;
        let snapshot = self.store.list_all(&self.collection)?;

        for doc in &snapshot {
            let existing: SummaryAggregate = self.vault.open(&doc.record)?;
            if existing.user_id == aggregate.user_id {
                self.store.set(&self.collection, &doc.id, &sealed)?;
                tracing::debug!(user_id = %aggregate.user_id, doc_id = %doc.id, "summary overwritten");
                return Ok(());
            }
        }

        let id = self.store.add(&self.collection, &sealed)?;
        tracing::debug!(user_id = %aggregate.user_id, doc_id = %id, "summary inserted");
        Ok(())
    }

    fn user_lock(&self, user_id: &str) -> Result<Arc<tokio::sync::Mutex<()>>, DispatchError> {
        let mut locks = self
            .user_locks
            .lock()
            .map_err(|e| DispatchError::Session(format!("user lock poisoned: {}", e)))?;
        Ok(Arc::clone(
            locks
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        ))
    }
}
