//! Collaborator traits and the built-in offline classifier.
//!
//! The intent classifier and the open-domain answer source are remote
//! services in production; both are modeled as async traits so transports
//! can plug in their own clients. Failures are fatal to the turn that made
//! the call; retry policy belongs to the clients themselves.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

use confab_core::types::{AnswerCandidate, Classification};

use crate::error::DispatchError;

/// Ranks an utterance against the intent model.
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify one utterance into its top intent with a confidence score.
    async fn classify(&self, text: &str) -> Result<Classification, DispatchError>;
}

/// Looks an utterance up in the open-domain knowledge base.
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Return ranked answer candidates; an empty list is a valid outcome.
    async fn answer(&self, text: &str) -> Result<Vec<AnswerCandidate>, DispatchError>;
}

// =============================================================================
// PatternClassifier
// =============================================================================

/// Intent label returned when no pattern matches.
pub const UNMATCHED_INTENT: &str = "None";

struct IntentPattern {
    intent: &'static str,
    patterns: Vec<Regex>,
}

static INTENT_PATTERNS: LazyLock<Vec<IntentPattern>> = LazyLock::new(|| {
    let mk = |intent: &'static str, pats: &[&str]| -> IntentPattern {
        IntentPattern {
            intent,
            patterns: pats
                .iter()
                .map(|p| Regex::new(p).expect("Invalid intent regex"))
                .collect(),
        }
    };

    // Checked in severity order so the most urgent match wins.
    vec![
        mk(
            "CrisisHelp",
            &[
                r"(?i)\bhurt\s+myself\b",
                r"(?i)\bend\s+it\s+all\b",
                r"(?i)\bcan'?t\s+go\s+on\b",
                r"(?i)\bwant\s+to\s+disappear\b",
            ],
        ),
        mk(
            "Hopeless",
            &[
                r"(?i)\bhopeless\b",
                r"(?i)\bno\s+point\b",
                r"(?i)\bnothing\s+matters\b",
                r"(?i)\bgiven?\s+up\b",
            ],
        ),
        mk(
            "Distressed",
            &[
                r"(?i)\boverwhelmed\b",
                r"(?i)\bfalling\s+apart\b",
                r"(?i)\bcan'?t\s+cope\b",
                r"(?i)\bbreaking\s+down\b",
            ],
        ),
        mk(
            "Anxious",
            &[
                r"(?i)\banxious\b",
                r"(?i)\bpanic\b",
                r"(?i)\bworried\s+sick\b",
                r"(?i)\bon\s+edge\b",
            ],
        ),
        mk(
            "Angry",
            &[
                r"(?i)\bfurious\b",
                r"(?i)\bso\s+angry\b",
                r"(?i)\bfed\s+up\b",
            ],
        ),
        mk(
            "Lonely",
            &[
                r"(?i)\blonely\b",
                r"(?i)\ball\s+alone\b",
                r"(?i)\bno\s+one\s+to\s+talk\s+to\b",
            ],
        ),
        mk(
            "Sad",
            &[
                r"(?i)\bsad\b",
                r"(?i)\bfeel(?:ing)?\s+(?:low|down)\b",
                r"(?i)\bunhappy\b",
                r"(?i)\bmiserable\b",
            ],
        ),
        mk(
            "Tired",
            &[
                r"(?i)\btired\b",
                r"(?i)\bexhausted\b",
                r"(?i)\bdrained\b",
                r"(?i)\bworn\s+out\b",
            ],
        ),
        mk(
            "Greeting",
            &[
                r"(?i)^\s*(?:hi|hello|hey)\b",
                r"(?i)\bgood\s+(?:morning|afternoon|evening)\b",
            ],
        ),
    ]
});

/// Confidence assigned to a pattern hit.
const MATCH_CONFIDENCE: f64 = 0.9;

/// Regex-backed [`IntentClassifier`] for embedded and offline use.
///
/// Its labels line up with the intensity table; remote classifiers are
/// expected to emit the same label set.
#[derive(Default)]
pub struct PatternClassifier;

impl PatternClassifier {
    pub fn new() -> Self {
        Self
    }

    fn classify_sync(&self, text: &str) -> Classification {
        for entry in INTENT_PATTERNS.iter() {
            if entry.patterns.iter().any(|p| p.is_match(text)) {
                return Classification {
                    intent: entry.intent.to_string(),
                    confidence: MATCH_CONFIDENCE,
                    entities: vec![],
                };
            }
        }
        Classification {
            intent: UNMATCHED_INTENT.to_string(),
            confidence: 0.0,
            entities: vec![],
        }
    }
}

#[async_trait]
impl IntentClassifier for PatternClassifier {
    async fn classify(&self, text: &str) -> Result<Classification, DispatchError> {
        Ok(self.classify_sync(text))
    }
}
