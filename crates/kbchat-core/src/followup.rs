//! Follow-up question detection.
//!
//! Matching is plain substring containment on the lower-cased utterance, so
//! partial-word hits count too ("it" matches "with"). Only the visual
//! emphasis of the user's message depends on it.

/// Phrases that mark an utterance as referring back to earlier turns.
pub const FOLLOW_UP_PATTERNS: &[&str] = &[
    // demonstratives
    "それって",
    "それは",
    "その",
    "これって",
    "これは",
    "この",
    "that",
    "this",
    "it",
    "what about",
    "how about",
    // "specifically" / examples
    "詳しく",
    "具体的に",
    "例を",
    "for example",
    "specifically",
    // why / how
    "なぜ",
    "どうして",
    "why",
    "how come",
    // more / other
    "他には",
    "他に",
    "other",
    "else",
    "more",
];

/// Returns true if the utterance contains any follow-up phrase.
pub fn is_follow_up(utterance: &str) -> bool {
    let lowered = utterance.to_lowercase();
    FOLLOW_UP_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(&pattern.to_lowercase()))
}
