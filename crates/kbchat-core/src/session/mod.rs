//! Session domain module.
//!
//! # Module Structure
//!
//! - `history`: bounded conversation history (`ConversationHistory`)
//! - `phase`: chat state machine phases (`ChatPhase`)
//! - `state`: session state with processing guard (`SessionState`, `SessionFlags`)

mod history;
mod phase;
mod state;

pub use history::{ConversationHistory, DEFAULT_HISTORY_LIMIT};
pub use kbchat_types::ConversationTurn;
pub use phase::ChatPhase;
pub use state::{Rejection, SessionFlags, SessionState, lock_session};
