//! SQLite-backed record store.
//!
//! Wraps a single rusqlite Connection in a Mutex for thread-safe access.
//! Configures WAL mode and recommended PRAGMAs on initialization.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension};
use tracing::info;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{Document, RecordStore};

/// Thread-safe SQLite [`RecordStore`] backend.
///
/// All collections share one `records` table with a composite primary key.
/// The connection is wrapped in a Mutex since rusqlite Connection is not Sync.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database at the given path.
    ///
    /// Configures WAL mode, synchronous=NORMAL, and creates the records
    /// table if it does not exist.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(format!("Failed to create data dir: {}", e)))?;
        }

        let conn = Connection::open(path)
            .map_err(|e| StoreError::Backend(format!("Failed to open database: {}", e)))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| StoreError::Backend(format!("Failed to set pragmas: {}", e)))?;

        info!("Record store opened at {}", path.display());

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.with_conn(init_schema)?;
        Ok(store)
    }

    /// Open an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Backend(format!("Failed to open in-memory db: {}", e)))?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.with_conn(init_schema)?;
        Ok(store)
    }

    /// Execute a closure with a reference to the underlying connection.
    ///
    /// The mutex is held for the duration of the closure.
    fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        f(&conn)
    }
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS records (
             collection TEXT NOT NULL,
             id         TEXT NOT NULL,
             record     BLOB NOT NULL,
             PRIMARY KEY (collection, id)
         );",
    )
    .map_err(|e| StoreError::Backend(format!("Failed to create schema: {}", e)))
}

impl RecordStore for SqliteStore {
    fn add(&self, collection: &str, record: &[u8]) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO records (collection, id, record) VALUES (?1, ?2, ?3)",
                rusqlite::params![collection, id, record],
            )
            .map_err(|e| StoreError::Backend(format!("Failed to add record: {}", e)))?;
            Ok(())
        })?;
        Ok(id)
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT record FROM records WHERE collection = ?1 AND id = ?2",
                rusqlite::params![collection, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StoreError::Backend(format!("Failed to get record: {}", e)))
        })
    }

    fn set(&self, collection: &str, id: &str, record: &[u8]) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO records (collection, id, record) VALUES (?1, ?2, ?3)",
                rusqlite::params![collection, id, record],
            )
            .map_err(|e| StoreError::Backend(format!("Failed to set record: {}", e)))?;
            Ok(())
        })
    }

    fn list_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, record FROM records WHERE collection = ?1")
                .map_err(|e| StoreError::Backend(e.to_string()))?;

            let rows = stmt
                .query_map(rusqlite::params![collection], |row| {
                    Ok(Document {
                        id: row.get(0)?,
                        record: row.get(1)?,
                    })
                })
                .map_err(|e| StoreError::Backend(e.to_string()))?;

            let mut documents = Vec::new();
            for row in rows {
                documents.push(row.map_err(|e| StoreError::Backend(e.to_string()))?);
            }
            Ok(documents)
        })
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_add_get() {
        let store = SqliteStore::in_memory().unwrap();
        let id = store.add("c", b"payload").unwrap();
        assert_eq!(store.get("c", &id).unwrap().unwrap(), b"payload");
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get("c", "nope").unwrap().is_none());
    }

    #[test]
    fn test_set_inserts_and_replaces() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("c", "5_key", b"old").unwrap();
        store.set("c", "5_key", b"new").unwrap();
        assert_eq!(store.get("c", "5_key").unwrap().unwrap(), b"new");
        assert_eq!(store.list_all("c").unwrap().len(), 1);
    }

    #[test]
    fn test_list_all_returns_every_document() {
        let store = SqliteStore::in_memory().unwrap();
        store.add("c", b"one").unwrap();
        store.add("c", b"two").unwrap();
        store.add("other", b"three").unwrap();

        let docs = store.list_all("c").unwrap();
        assert_eq!(docs.len(), 2);
        let mut records: Vec<Vec<u8>> = docs.into_iter().map(|d| d.record).collect();
        records.sort();
        assert_eq!(records, vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn test_collections_are_isolated() {
        let store = SqliteStore::in_memory().unwrap();
        store.set("a", "k", b"in-a").unwrap();
        store.set("b", "k", b"in-b").unwrap();
        assert_eq!(store.get("a", "k").unwrap().unwrap(), b"in-a");
        assert_eq!(store.get("b", "k").unwrap().unwrap(), b"in-b");
    }

    #[test]
    fn test_on_disk_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set("c", "k", b"durable").unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("c", "k").unwrap().unwrap(), b"durable");
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("records.db");
        let store = SqliteStore::open(&path).unwrap();
        store.set("c", "k", b"v").unwrap();
        assert!(path.exists());
    }
}
