//! Static intent-to-severity table.
//!
//! Weights range 0..=8 and feed the persistence key prefix and the
//! per-session average. They order and score interactions; nothing in the
//! pipeline branches on them.

/// Severity weight per intent label. Intents absent from this table weigh 0.
static INTENSITY_TABLE: &[(&str, u8)] = &[
    ("CrisisHelp", 8),
    ("Hopeless", 7),
    ("Distressed", 6),
    ("Anxious", 5),
    ("Angry", 4),
    ("Lonely", 3),
    ("Sad", 2),
    ("Tired", 1),
    ("Greeting", 0),
];

/// Look up the severity weight for an intent label.
///
/// Unmapped intents weigh 0; that is a valid outcome, not an error.
pub fn intensity_for(intent: &str) -> u8 {
    INTENSITY_TABLE
        .iter()
        .find(|(label, _)| *label == intent)
        .map(|(_, weight)| *weight)
        .unwrap_or(0)
}
