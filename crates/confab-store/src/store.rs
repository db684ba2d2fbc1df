//! The record store abstraction and the in-memory backend.
//!
//! A store is a set of named collections, each holding opaque byte records
//! addressed by a string id. The store never interprets record contents;
//! sealed and plain records share the same surface.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use uuid::Uuid;

use crate::error::StoreError;

/// One stored record together with its id, as returned by [`RecordStore::list_all`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub record: Vec<u8>,
}

/// A collection-of-documents store.
///
/// `set` is insert-or-replace and doubles as "persist under a caller-chosen
/// key". `list_all` makes no ordering guarantee; callers that care about
/// order must encode it into their keys.
pub trait RecordStore: Send + Sync {
    /// Insert a record under a store-assigned id and return that id.
    fn add(&self, collection: &str, record: &[u8]) -> Result<String, StoreError>;

    /// Fetch a record by id, or `None` if absent.
    fn get(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or replace the record under the given id.
    fn set(&self, collection: &str, id: &str, record: &[u8]) -> Result<(), StoreError>;

    /// Snapshot every document in the collection.
    fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;
}

/// In-memory [`RecordStore`] backend.
///
/// Collections are keyed maps ordered by id, so a `list_all` over
/// severity-prefixed keys comes back highest severity first.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_collections<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut HashMap<String, BTreeMap<String, Vec<u8>>>) -> T,
    {
        let mut collections = self
            .collections
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(f(&mut collections))
    }
}

impl RecordStore for MemoryStore {
    fn add(&self, collection: &str, record: &[u8]) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.with_collections(|collections| {
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), record.to_vec());
        })?;
        Ok(id)
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.with_collections(|collections| {
            collections
                .get(collection)
                .and_then(|docs| docs.get(id).cloned())
        })
    }

    fn set(&self, collection: &str, id: &str, record: &[u8]) -> Result<(), StoreError> {
        self.with_collections(|collections| {
            collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), record.to_vec());
        })
    }

    fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.with_collections(|collections| {
            collections
                .get(collection)
                .map(|docs| {
                    docs.iter()
                        .map(|(id, record)| Document {
                            id: id.clone(),
                            record: record.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default()
        })
    }
}
