//! Bounded conversation history.

use kbchat_types::ConversationTurn;

/// Default maximum number of turns kept in a session.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Ordered conversation turns, most recent last.
///
/// Holds at most `limit` turns; committing beyond that drops the oldest.
/// Turns are never mutated once pushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
    limit: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl ConversationHistory {
    /// Creates an empty history. A limit of zero is treated as one.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            turns: Vec::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Appends a turn and drops the oldest ones beyond the limit.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
        if self.turns.len() > self.limit {
            let excess = self.turns.len() - self.limit;
            self.turns.drain(..excess);
        }
    }

    /// The last `n` turns (or fewer), in original order.
    pub fn recent(&self, n: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }
}
