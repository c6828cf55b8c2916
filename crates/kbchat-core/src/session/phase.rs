//! Chat state machine phases.

use serde::{Deserialize, Serialize};

/// Where a chat session currently is in its submit/response cycle.
///
/// The cycle is `Idle → Submitting → AwaitingResponse → Idle`; there is no
/// terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChatPhase {
    /// Waiting for user input.
    #[default]
    Idle,
    /// A submission was accepted and is being rendered and sent.
    Submitting,
    /// The request is in flight.
    AwaitingResponse,
}

impl ChatPhase {
    pub fn is_idle(self) -> bool {
        matches!(self, ChatPhase::Idle)
    }
}
