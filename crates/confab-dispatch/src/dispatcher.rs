//! Turn dispatcher: central coordinator wiring router, recorder, reducer,
//! merger, and presence tracking.
//!
//! Owns the session working memory and serializes turns per conversation.

use std::sync::Arc;

use tracing::{info, warn};

use confab_core::config::ConfabConfig;
use confab_core::types::TurnEvent;
use confab_store::{RecordStore, Vault};

use crate::collaborators::{AnswerSource, IntentClassifier};
use crate::error::DispatchError;
use crate::merger::SummaryMerger;
use crate::presence::UserPresenceTracker;
use crate::recorder::InteractionRecorder;
use crate::reducer::SessionReducer;
use crate::router::{RoutingDecision, TurnRouter};
use crate::session::SessionManager;

/// Outbound effect of one handled turn.
#[derive(Clone, Debug, PartialEq)]
pub enum TurnOutcome {
    /// Continue the session: one chat reply, plus the finish affordance.
    Reply { text: String, offer_finish: bool },
    /// The session was closed; no further replies follow.
    SessionClosed,
}

/// Central dispatcher that coordinates the turn pipeline.
pub struct Dispatcher {
    router: TurnRouter,
    recorder: InteractionRecorder,
    reducer: SessionReducer,
    merger: SummaryMerger,
    presence: UserPresenceTracker,
    sessions: SessionManager,
    classifier: Arc<dyn IntentClassifier>,
    answers: Arc<dyn AnswerSource>,
    greeting: String,
}

impl Dispatcher {
    /// Build a dispatcher from configuration and its collaborators.
    pub fn new(
        config: &ConfabConfig,
        store: Arc<dyn RecordStore>,
        vault: Arc<Vault>,
        classifier: Arc<dyn IntentClassifier>,
        answers: Arc<dyn AnswerSource>,
    ) -> Self {
        let router = TurnRouter::new(
            config.session.termination_keyword.clone(),
            config.session.no_answer_reply.clone(),
        );
        let recorder = InteractionRecorder::new(
            Arc::clone(&store),
            Arc::clone(&vault),
            config.storage.interactions_collection.clone(),
        );
        let merger = SummaryMerger::new(
            Arc::clone(&store),
            Arc::clone(&vault),
            config.storage.summaries_collection.clone(),
        );
        let presence = UserPresenceTracker::new(
            Arc::clone(&store),
            config.storage.profiles_collection.clone(),
        );

        Self {
            router,
            recorder,
            reducer: SessionReducer,
            merger,
            presence,
            sessions: SessionManager::new(),
            classifier,
            answers,
            greeting: config.session.greeting.clone(),
        }
    }

    /// Open a session for the conversation and return the greeting.
    ///
    /// Marks the user present; presence is best-effort and never fails the
    /// open.
    pub fn open_session(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> Result<String, DispatchError> {
        self.sessions.open(conversation_id)?;
        if let Err(e) = self.presence.set_active(user_id, true) {
            warn!(user_id, error = %e, "presence update failed on session open");
        }
        info!(conversation_id, "session opened");
        Ok(self.greeting.clone())
    }

    /// Handle one inbound turn.
    ///
    /// Holds the per-conversation guard for the whole pipeline, so turns
    /// within one conversation never overlap. Mid-pipeline failures abort
    /// the turn; side effects already performed are not compensated.
    pub async fn handle_turn(&self, event: &TurnEvent) -> Result<TurnOutcome, DispatchError> {
        let guard = self.sessions.guard(&event.conversation_id)?;
        let _turn = guard.lock().await;

        let decision = self
            .router
            .route(event, self.classifier.as_ref(), self.answers.as_ref())
            .await?;

        match decision {
            RoutingDecision::Continue {
                classification,
                reply,
            } => {
                self.recorder.record(
                    &self.sessions,
                    &event.conversation_id,
                    &event.user_id,
                    &classification,
                    &event.text,
                )?;
                Ok(TurnOutcome::Reply {
                    text: reply,
                    offer_finish: true,
                })
            }
            RoutingDecision::Terminate => {
                if let Some(aggregate) = self.reducer.finalize(
                    &self.sessions,
                    &event.conversation_id,
                    &event.user_id,
                )? {
                    self.merger.upsert(&aggregate).await?;
                }
                if let Err(e) = self.presence.set_active(&event.user_id, false) {
                    warn!(user_id = %event.user_id, error = %e, "presence update failed on session close");
                }
                info!(conversation_id = %event.conversation_id, "session closed");
                Ok(TurnOutcome::SessionClosed)
            }
        }
    }

    /// The session working memory, for inspection and listings.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}
