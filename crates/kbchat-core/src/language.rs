//! Japanese/English language classification.
//!
//! Two independent signals are computed for a text:
//! - **Japanese**: at least one Hiragana, Katakana or CJK ideograph character.
//! - **Latin-only**: every character is an ASCII letter, whitespace or one of
//!   `.,!?;:'"()-`.
//!
//! A text is [`Language::Mixed`] when it carries the Japanese signal and at
//! least part of it (the whole text or one of its non-empty lines) carries the
//! Latin-only signal. Text with neither signal (digits, emoji, accented Latin)
//! is [`Language::Neither`] and renders as English.

use serde::{Deserialize, Serialize};

const LATIN_PUNCTUATION: &str = ".,!?;:'\"()-";

/// Outcome of classifying a whole text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    Japanese,
    English,
    Mixed,
    Neither,
}

/// Language tag attached to a rendered segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageTag {
    Japanese,
    English,
}

/// A run of text rendered with a single language style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub tag: LanguageTag,
}

impl Segment {
    pub fn new(text: impl Into<String>, tag: LanguageTag) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }
}

impl Language {
    /// Tag used when the whole text is rendered as one segment.
    ///
    /// `Neither` falls back to English. `Mixed` also maps to English here,
    /// but mixed text is normally split with [`segment`] instead.
    pub fn render_tag(self) -> LanguageTag {
        match self {
            Language::Japanese => LanguageTag::Japanese,
            Language::English | Language::Mixed | Language::Neither => LanguageTag::English,
        }
    }
}

fn is_japanese_char(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'   // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{4E00}'..='\u{9FAF}' // CJK unified ideographs
    )
}

fn is_latin_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_whitespace() || LATIN_PUNCTUATION.contains(c)
}

/// Returns true if the text contains any Japanese character.
pub fn contains_japanese(text: &str) -> bool {
    text.chars().any(is_japanese_char)
}

/// Returns true if the text is non-empty and made only of the restricted
/// Latin charset.
pub fn is_latin_only(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_latin_char)
}

/// Classifies a text.
pub fn classify(text: &str) -> Language {
    let japanese = contains_japanese(text);
    let latin = is_latin_only(text)
        || (japanese
            && text
                .split('\n')
                .any(|line| !line.trim().is_empty() && is_latin_only(line)));

    match (japanese, latin) {
        (true, true) => Language::Mixed,
        (true, false) => Language::Japanese,
        (false, true) => Language::English,
        (false, false) => Language::Neither,
    }
}

/// Splits a text into styled segments.
///
/// Mixed text is split on line breaks; each non-empty line becomes its own
/// segment, tagged Japanese if it contains a Japanese character and English
/// otherwise. Any other text becomes a single segment holding the full text.
pub fn segment(text: &str) -> Vec<Segment> {
    match classify(text) {
        Language::Mixed => text
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let tag = if contains_japanese(line) {
                    LanguageTag::Japanese
                } else {
                    LanguageTag::English
                };
                Segment::new(line, tag)
            })
            .collect(),
        language => vec![Segment::new(text, language.render_tag())],
    }
}
