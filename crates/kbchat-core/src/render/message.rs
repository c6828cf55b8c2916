//! Transcript entry types.

use serde::{Deserialize, Serialize};

use crate::language::Segment;

/// Who a transcript entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Bot,
}

/// Visual emphasis applied to a whole entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Emphasis {
    #[default]
    Normal,
    /// The user's message refers back to earlier turns.
    FollowUp,
}

/// A displayed transcript entry.
///
/// Segment text is already escaped. Transient entries ("thinking"
/// placeholders) are removed before the real response is rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub sender: Sender,
    pub segments: Vec<Segment>,
    pub is_transient: bool,
    #[serde(default)]
    pub emphasis: Emphasis,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl RenderedMessage {
    /// All segment texts joined with newlines.
    pub fn plain_text(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Opaque reference to an inserted transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageHandle(pub u64);
