//! Application layer for kbchat.
//!
//! Coordinates the domain types in `kbchat-core` with a chat or diagnostics
//! backend and the views supplied by a front-end.

pub mod controller;
pub mod diagnostics;
pub mod messages;

pub use controller::{ChatController, SubmitOutcome};
pub use diagnostics::DiagnosticsPipeline;
pub use messages::Locale;
