//! Interaction recording.
//!
//! Each continued turn becomes one record: appended to the session log and
//! persisted individually, sealed, under a key whose prefix inverts the
//! severity weight so a lexicographic scan reads highest severity first.

use std::sync::Arc;

use uuid::Uuid;

use confab_core::types::{Classification, InteractionRecord};
use confab_store::{RecordStore, Vault};

use crate::error::DispatchError;
use crate::intensity::intensity_for;
use crate::session::SessionManager;

/// Builds, appends, and persists per-turn interaction records.
pub struct InteractionRecorder {
    store: Arc<dyn RecordStore>,
    vault: Arc<Vault>,
    collection: String,
}

impl InteractionRecorder {
    pub fn new(store: Arc<dyn RecordStore>, vault: Arc<Vault>, collection: String) -> Self {
        Self {
            store,
            vault,
            collection,
        }
    }

    /// Record one classified turn.
    ///
    /// Appends to the session log first, then writes the sealed copy. A
    /// failed write propagates without rolling back the append; in-memory
    /// state may lead the durable store.
    pub fn record(
        &self,
        sessions: &SessionManager,
        conversation_id: &str,
        user_id: &str,
        classification: &Classification,
        utterance: &str,
    ) -> Result<InteractionRecord, DispatchError> {
        let intensity = intensity_for(&classification.intent);
        let record = InteractionRecord {
            utterance: utterance.to_string(),
            intent: classification.intent.clone(),
            confidence: classification.confidence,
            intensity,
            user_id: user_id.to_string(),
        };

        sessions.append(conversation_id, record.clone())?;

        let key = severity_key(intensity);
        let sealed = self.vault.seal(&record)?;
        self.store.set(&self.collection, &key, &sealed)?;
        tracing::debug!(
            conversation_id,
            intent = %record.intent,
            key = %key,
            "interaction recorded"
        );

        Ok(record)
    }
}

/// Build a persistence key that sorts by descending severity.
///
/// The prefix is `8 - intensity`, so intensity 8 yields `0_…` and an
/// unmapped intent (intensity 0) yields `8_…`. The inversion is the point;
/// do not flip it.
pub fn severity_key(intensity: u8) -> String {
    format!("{}_{}", 8u8.saturating_sub(intensity), Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use confab_store::MemoryStore;

    fn classification(intent: &str, confidence: f64) -> Classification {
        Classification {
            intent: intent.to_string(),
            confidence,
            entities: vec![],
        }
    }

    fn recorder_with_store() -> (InteractionRecorder, Arc<MemoryStore>, Arc<Vault>) {
        let store = Arc::new(MemoryStore::new());
        let vault = Arc::new(Vault::new("test-secret").unwrap());
        let recorder = InteractionRecorder::new(
            Arc::clone(&store) as Arc<dyn RecordStore>,
            Arc::clone(&vault),
            "interactions".to_string(),
        );
        (recorder, store, vault)
    }

    // ---- Severity key ----

    #[test]
    fn test_severity_key_inverts_intensity() {
        assert!(severity_key(8).starts_with("0_"));
        assert!(severity_key(1).starts_with("7_"));
        assert!(severity_key(0).starts_with("8_"));
    }

    #[test]
    fn test_severity_key_suffix_is_unique() {
        let a = severity_key(3);
        let b = severity_key(3);
        assert_ne!(a, b);
        assert!(a.starts_with("5_"));
        assert!(b.starts_with("5_"));
    }

    // ---- Recording ----

    #[test]
    fn test_record_appends_and_persists() {
        let (recorder, store, vault) = recorder_with_store();
        let sessions = SessionManager::new();
        sessions.open("conv-1").unwrap();

        let record = recorder
            .record(
                &sessions,
                "conv-1",
                "u1",
                &classification("CrisisHelp", 0.95),
                "I can't go on",
            )
            .unwrap();

        assert_eq!(record.intensity, 8);
        assert_eq!(sessions.records("conv-1").unwrap(), vec![record.clone()]);

        let docs = store.list_all("interactions").unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].id.starts_with("0_"));
        let persisted: InteractionRecord = vault.open(&docs[0].record).unwrap();
        assert_eq!(persisted, record);
    }

    #[test]
    fn test_record_unmapped_intent_gets_zero_intensity() {
        let (recorder, store, _) = recorder_with_store();
        let sessions = SessionManager::new();

        let record = recorder
            .record(
                &sessions,
                "conv-1",
                "u1",
                &classification("BookFlight", 0.6),
                "book me a flight",
            )
            .unwrap();

        assert_eq!(record.intensity, 0);
        let docs = store.list_all("interactions").unwrap();
        assert!(docs[0].id.starts_with("8_"));
    }

    #[test]
    fn test_records_scan_highest_severity_first() {
        let (recorder, store, _) = recorder_with_store();
        let sessions = SessionManager::new();

        recorder
            .record(&sessions, "c", "u1", &classification("Tired", 0.9), "worn out")
            .unwrap();
        recorder
            .record(&sessions, "c", "u1", &classification("CrisisHelp", 0.9), "help")
            .unwrap();
        recorder
            .record(&sessions, "c", "u1", &classification("Sad", 0.9), "feeling low")
            .unwrap();

        let prefixes: Vec<char> = store
            .list_all("interactions")
            .unwrap()
            .into_iter()
            .map(|d| d.id.chars().next().unwrap())
            .collect();
        // MemoryStore lists in key order: CrisisHelp (0_), Sad (6_), Tired (7_).
        assert_eq!(prefixes, vec!['0', '6', '7']);
    }

    #[test]
    fn test_record_keeps_session_order_across_severities() {
        let (recorder, _, _) = recorder_with_store();
        let sessions = SessionManager::new();

        recorder
            .record(&sessions, "c", "u1", &classification("Tired", 0.9), "first")
            .unwrap();
        recorder
            .record(&sessions, "c", "u1", &classification("CrisisHelp", 0.9), "second")
            .unwrap();

        let utterances: Vec<String> = sessions
            .records("c")
            .unwrap()
            .into_iter()
            .map(|r| r.utterance)
            .collect();
        // Session order is arrival order, independent of the storage keys.
        assert_eq!(utterances, vec!["first", "second"]);
    }
}
