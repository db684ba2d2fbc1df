//! Durable persistence for Confab.
//!
//! Provides the [`RecordStore`] abstraction over a collection-of-documents
//! store, an in-memory backend for tests and embedded use, a SQLite backend,
//! and the [`Vault`] that seals records before they reach either one.

pub mod error;
pub mod sqlite;
pub mod store;
pub mod vault;

pub use error::StoreError;
pub use sqlite::SqliteStore;
pub use store::{Document, MemoryStore, RecordStore};
pub use vault::Vault;
