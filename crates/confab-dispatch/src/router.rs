//! Turn routing.
//!
//! Decides, per inbound turn, between closing the session and continuing
//! it. Continuation always consults both collaborators: the classifier
//! result feeds instrumentation, the open-domain answer feeds the reply,
//! and a confident structured-intent match does not suppress the answer
//! lookup. Those are two independent sub-decisions carried side by side.

use confab_core::types::{Classification, TurnEvent};

use crate::collaborators::{AnswerSource, IntentClassifier};
use crate::error::DispatchError;

/// Outcome of routing one turn.
#[derive(Clone, Debug, PartialEq)]
pub enum RoutingDecision {
    /// The turn closes the session; no collaborator was consulted.
    Terminate,
    /// The turn continues the session.
    Continue {
        /// What to record: the classifier's verdict on the utterance.
        classification: Classification,
        /// What to say: the top open-domain answer, or the fallback text.
        reply: String,
    },
}

/// Routes turns between termination and continuation.
pub struct TurnRouter {
    termination_keyword: String,
    no_answer_reply: String,
}

impl TurnRouter {
    pub fn new(termination_keyword: String, no_answer_reply: String) -> Self {
        Self {
            termination_keyword,
            no_answer_reply,
        }
    }

    /// Whether the event closes its session.
    ///
    /// Either the transport's postback flag or a literal keyword match on
    /// the trimmed text counts.
    pub fn is_termination(&self, event: &TurnEvent) -> bool {
        event.terminate
            || event
                .text
                .trim()
                .eq_ignore_ascii_case(&self.termination_keyword)
    }

    /// Route one turn.
    ///
    /// Termination short-circuits before the classifier. Otherwise the
    /// classifier runs first, then the answer source; a collaborator error
    /// aborts the turn.
    pub async fn route(
        &self,
        event: &TurnEvent,
        classifier: &dyn IntentClassifier,
        answers: &dyn AnswerSource,
    ) -> Result<RoutingDecision, DispatchError> {
        if self.is_termination(event) {
            return Ok(RoutingDecision::Terminate);
        }

        let classification = classifier.classify(&event.text).await?;
        tracing::debug!(
            intent = %classification.intent,
            confidence = classification.confidence,
            "turn classified"
        );

        let candidates = answers.answer(&event.text).await?;
        let reply = candidates
            .first()
            .map(|c| c.answer.clone())
            .unwrap_or_else(|| self.no_answer_reply.clone());

        Ok(RoutingDecision::Continue {
            classification,
            reply,
        })
    }
}
