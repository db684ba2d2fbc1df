//! Session working memory.
//!
//! Tracks the per-conversation interaction log from first turn to
//! termination. Sessions are transient; a process restart loses any
//! in-flight session and no durability is claimed for open ones.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone};

use confab_core::types::{InteractionRecord, SessionSummary};

use crate::error::DispatchError;

struct SessionState {
    records: Vec<InteractionRecord>,
    opened_at: i64,
    last_turn_at: i64,
    turn_count: usize,
}

impl SessionState {
    fn new() -> Self {
        let now = Local::now().timestamp();
        Self {
            records: Vec::new(),
            opened_at: now,
            last_turn_at: now,
            turn_count: 0,
        }
    }
}

/// Owns every in-progress session and hands out per-conversation guards.
///
/// The guard serializes turns: at most one turn per conversation may be in
/// flight, otherwise concurrent append/finalize would corrupt the aggregate.
#[derive(Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<String, SessionState>>,
    guards: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session log for the conversation if none exists.
    pub fn open(&self, conversation_id: &str) -> Result<(), DispatchError> {
        let mut sessions = self.lock_sessions()?;
        sessions
            .entry(conversation_id.to_string())
            .or_insert_with(SessionState::new);
        Ok(())
    }

    /// Append a record to the conversation's log.
    ///
    /// Creates the log if absent; normally `open` has already run, but a
    /// turn arriving before the member-joined event must not be dropped.
    pub fn append(
        &self,
        conversation_id: &str,
        record: InteractionRecord,
    ) -> Result<(), DispatchError> {
        let mut sessions = self.lock_sessions()?;
        let state = sessions
            .entry(conversation_id.to_string())
            .or_insert_with(SessionState::new);
        state.records.push(record);
        state.last_turn_at = Local::now().timestamp();
        state.turn_count += 1;
        Ok(())
    }

    /// Take the conversation's accumulated records, leaving an empty log.
    ///
    /// The entry itself is kept: turns arriving after a termination must
    /// find an empty list, not "session not found". Unknown conversations
    /// yield an empty vec.
    pub fn drain(&self, conversation_id: &str) -> Result<Vec<InteractionRecord>, DispatchError> {
        let mut sessions = self.lock_sessions()?;
        Ok(sessions
            .get_mut(conversation_id)
            .map(|state| std::mem::take(&mut state.records))
            .unwrap_or_default())
    }

    /// Clone the conversation's current records, for inspection.
    pub fn records(&self, conversation_id: &str) -> Result<Vec<InteractionRecord>, DispatchError> {
        let sessions = self.lock_sessions()?;
        Ok(sessions
            .get(conversation_id)
            .map(|state| state.records.clone())
            .unwrap_or_default())
    }

    /// Whether a session log exists for the conversation.
    pub fn is_open(&self, conversation_id: &str) -> bool {
        self.lock_sessions()
            .map(|sessions| sessions.contains_key(conversation_id))
            .unwrap_or(false)
    }

    /// List all known sessions as summaries.
    pub fn list(&self) -> Vec<SessionSummary> {
        let sessions = match self.lock_sessions() {
            Ok(s) => s,
            Err(_) => return vec![],
        };
        sessions
            .iter()
            .map(|(conversation_id, state)| SessionSummary {
                conversation_id: conversation_id.clone(),
                opened_at: format_epoch(state.opened_at),
                last_turn_at: format_epoch(state.last_turn_at),
                turn_count: state.turn_count,
            })
            .collect()
    }

    /// Fetch the per-conversation turn guard, creating it on first use.
    ///
    /// Callers hold the guard across the whole turn, including awaits into
    /// the collaborators, so it is an async mutex.
    pub fn guard(
        &self,
        conversation_id: &str,
    ) -> Result<Arc<tokio::sync::Mutex<()>>, DispatchError> {
        let mut guards = self
            .guards
            .lock()
            .map_err(|e| DispatchError::Session(format!("guard lock poisoned: {}", e)))?;
        Ok(Arc::clone(
            guards
                .entry(conversation_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        ))
    }

    fn lock_sessions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, SessionState>>, DispatchError> {
        self.sessions
            .lock()
            .map_err(|e| DispatchError::Session(format!("session lock poisoned: {}", e)))
    }
}

/// Format epoch seconds as ISO 8601 string.
fn format_epoch(epoch: i64) -> String {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt: DateTime<Local>| dt.to_rfc3339())
        .unwrap_or_else(|| epoch.to_string())
}
