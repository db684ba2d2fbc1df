//! Session reduction.
//!
//! Folds a finished session's interaction log into one summary aggregate:
//! mean intensity, mean confidence, and the utterances in arrival order.

use confab_core::types::SummaryAggregate;

use crate::error::DispatchError;
use crate::session::SessionManager;

/// Reduces a session's records into a [`SummaryAggregate`] on termination.
pub struct SessionReducer;

impl SessionReducer {
    /// Finalize one session.
    ///
    /// Drains the session log (the entry survives as an empty list) and
    /// returns `None` when there is nothing to reduce: an empty session
    /// produces no summary and no store write.
    pub fn finalize(
        &self,
        sessions: &SessionManager,
        conversation_id: &str,
        user_id: &str,
    ) -> Result<Option<SummaryAggregate>, DispatchError> {
        let records = sessions.drain(conversation_id)?;
        if records.is_empty() {
            tracing::debug!(conversation_id, "empty session; nothing to reduce");
            return Ok(None);
        }

        let count = records.len() as f64;
        let avg_intensity = records
            .iter()
            .map(|r| f64::from(r.intensity))
            .sum::<f64>()
            / count;
        let avg_score = records.iter().map(|r| r.confidence).sum::<f64>() / count;
        let keywords = records.into_iter().map(|r| r.utterance).collect();

        Ok(Some(SummaryAggregate {
            avg_intensity,
            avg_score,
            keywords,
            user_id: user_id.to_string(),
        }))
    }
}
