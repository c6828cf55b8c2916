//! Session state owned by a single chat controller.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::history::ConversationHistory;
use super::phase::ChatPhase;
use kbchat_types::ConversationTurn;

/// Flags derived from the session's phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionFlags {
    pub is_processing: bool,
}

/// Why a turn could not begin. Both cases leave the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("utterance is empty")]
    EmptyUtterance,
    #[error("a request is already in flight")]
    AlreadyProcessing,
}

/// Conversation history plus the processing guard.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    history: ConversationHistory,
    phase: ChatPhase,
}

impl SessionState {
    pub fn new(history_limit: usize) -> Self {
        Self {
            history: ConversationHistory::with_limit(history_limit),
            phase: ChatPhase::Idle,
        }
    }

    pub fn phase(&self) -> ChatPhase {
        self.phase
    }

    pub fn flags(&self) -> SessionFlags {
        SessionFlags {
            is_processing: !self.phase.is_idle(),
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    /// Starts a turn. Nothing is recorded until [`commit_turn`](Self::commit_turn).
    pub fn begin_turn(&mut self, utterance: &str) -> Result<(), Rejection> {
        if self.flags().is_processing {
            return Err(Rejection::AlreadyProcessing);
        }
        if utterance.trim().is_empty() {
            return Err(Rejection::EmptyUtterance);
        }
        self.phase = ChatPhase::Submitting;
        Ok(())
    }

    /// Marks the request as sent. Only meaningful while submitting.
    pub fn mark_awaiting(&mut self) {
        if self.phase == ChatPhase::Submitting {
            self.phase = ChatPhase::AwaitingResponse;
        }
    }

    /// Appends a committed turn. Leaves the processing flag alone.
    pub fn commit_turn(
        &mut self,
        utterance: impl Into<String>,
        response: impl Into<String>,
        timestamp: impl Into<String>,
    ) {
        self.history
            .push(ConversationTurn::new(utterance, response, timestamp));
    }

    /// Returns to idle unconditionally.
    pub fn end_turn(&mut self) {
        self.phase = ChatPhase::Idle;
    }

    /// The last `n` turns (or fewer) to send as request context.
    pub fn recent_context(&self, n: usize) -> &[ConversationTurn] {
        self.history.recent(n)
    }
}

/// Locks a shared session, recovering the data if a holder panicked.
///
/// The state is plain data with no cross-field invariant that a panic
/// could leave half-updated, so the inner value is always usable.
pub fn lock_session(session: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_turn_sets_processing() {
        let mut state = SessionState::default();
        assert!(!state.flags().is_processing);

        state.begin_turn("hello").unwrap();

        assert!(state.flags().is_processing);
        assert_eq!(state.phase(), ChatPhase::Submitting);
        assert!(state.history().is_empty());
    }

    #[test]
    fn begin_turn_rejects_blank_utterances() {
        let mut state = SessionState::default();
        assert_eq!(state.begin_turn(""), Err(Rejection::EmptyUtterance));
        assert_eq!(state.begin_turn("  \n\t"), Err(Rejection::EmptyUtterance));
        assert!(!state.flags().is_processing);
    }

    #[test]
    fn guard_blocks_second_turn_until_released() {
        let mut state = SessionState::default();
        state.begin_turn("first").unwrap();

        assert_eq!(state.begin_turn("second"), Err(Rejection::AlreadyProcessing));
        assert_eq!(state.phase(), ChatPhase::Submitting);

        state.end_turn();
        assert!(state.begin_turn("second").is_ok());
    }

    #[test]
    fn mark_awaiting_only_moves_from_submitting() {
        let mut state = SessionState::default();
        state.mark_awaiting();
        assert_eq!(state.phase(), ChatPhase::Idle);

        state.begin_turn("q").unwrap();
        state.mark_awaiting();
        assert_eq!(state.phase(), ChatPhase::AwaitingResponse);
    }

    #[test]
    fn commit_does_not_touch_processing_flag() {
        let mut state = SessionState::default();
        state.begin_turn("q").unwrap();
        state.commit_turn("q", "a", "t");

        assert!(state.flags().is_processing);
        assert_eq!(state.history().len(), 1);

        state.end_turn();
        assert!(!state.flags().is_processing);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn commit_truncates_to_history_limit() {
        let mut state = SessionState::new(10);
        for i in 0..13 {
            state.commit_turn(format!("q{i}"), format!("a{i}"), "t");
        }
        assert_eq!(state.history().len(), 10);
        assert_eq!(state.history().turns()[0].utterance, "q3");
        assert_eq!(state.recent_context(3)[2].utterance, "q12");
    }

    #[test]
    fn end_turn_is_unconditional() {
        let mut state = SessionState::default();
        state.end_turn();
        assert!(!state.flags().is_processing);
    }

    #[test]
    fn poisoned_session_is_recovered() {
        let session = std::sync::Arc::new(Mutex::new(SessionState::default()));
        let cloned = session.clone();
        let _ = std::thread::spawn(move || {
            let mut guard = cloned.lock().unwrap();
            guard.begin_turn("q").unwrap();
            panic!("boom");
        })
        .join();

        let mut guard = lock_session(&session);
        guard.end_turn();
        assert!(!guard.flags().is_processing);
    }
}
