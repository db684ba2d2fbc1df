//! User presence tracking.
//!
//! Marks a user's persisted profile active on session open and inactive on
//! close. Confab never creates profiles; a missing one is a silent no-op.
//! Callers treat failures as best-effort and must not abort the turn.

use std::sync::Arc;

use confab_core::types::UserProfile;
use confab_store::RecordStore;

use crate::error::DispatchError;

/// Toggles the `active` flag on persisted user profiles.
pub struct UserPresenceTracker {
    store: Arc<dyn RecordStore>,
    collection: String,
}

impl UserPresenceTracker {
    pub fn new(store: Arc<dyn RecordStore>, collection: String) -> Self {
        Self { store, collection }
    }

    /// Set the user's `active` flag, preserving every other profile field.
    ///
    /// Missing profile: no-op, never an error.
    pub fn set_active(&self, user_id: &str, active: bool) -> Result<(), DispatchError> {
        let Some(bytes) = self.store.get(&self.collection, user_id)? else {
            tracing::debug!(user_id, "no profile to update");
            return Ok(());
        };

        let mut profile: UserProfile = serde_json::from_slice(&bytes)?;
        profile.active = active;
        let updated = serde_json::to_vec(&profile)?;
        self.store.set(&self.collection, user_id, &updated)?;
        tracing::debug!(user_id, active, "presence updated");
        Ok(())
    }
}
