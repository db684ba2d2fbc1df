use serde::{Deserialize, Serialize};

// =============================================================================
// Transport-facing types
// =============================================================================

/// One inbound message event within a conversation.
///
/// The `terminate` flag is set by the transport when the channel delivers its
/// end-of-session postback; the router additionally matches the literal
/// termination keyword against `text`, so either signal closes the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub text: String,
    pub terminate: bool,
    pub conversation_id: String,
    pub user_id: String,
}

/// A named entity extracted by the intent classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub value: String,
}

/// Result of classifying one utterance: the top-ranked intent label, its
/// confidence in `[0, 1]`, and any extracted entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: String,
    pub confidence: f64,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// One ranked candidate from the open-domain answer source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnswerCandidate {
    pub answer: String,
    pub score: f64,
}

// =============================================================================
// Session records
// =============================================================================

/// One processed turn, as accumulated in the session log.
///
/// Immutable once created. The session log owns it until it is persisted;
/// after that a sealed copy is owned by the durable store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub utterance: String,
    pub intent: String,
    pub confidence: f64,
    pub intensity: u8,
    pub user_id: String,
}

/// The per-user reduction of one finished session.
///
/// `keywords` holds the session's utterances in original turn order. The
/// summary collection contains at most one record per `user_id`; later
/// sessions overwrite it in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryAggregate {
    pub avg_intensity: f64,
    pub avg_score: f64,
    pub keywords: Vec<String>,
    pub user_id: String,
}

/// A user profile as stored in the profiles collection.
///
/// Confab does not own these records; it only toggles `active`. Unknown
/// fields are captured in `extra` so a write-back never drops them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub active: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Lightweight view of an in-progress session, for listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub conversation_id: String,
    pub opened_at: String,
    pub last_turn_at: String,
    pub turn_count: usize,
}
