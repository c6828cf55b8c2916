//! Domain layer of kbchat.
//!
//! Everything here is independent of HTTP and of any terminal: the
//! classifiers, the session state machine data, the rendering seam and the
//! diagnostics view models.

pub mod backend;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod followup;
pub mod language;
pub mod notifier;
pub mod render;
pub mod session;

// Re-export common types
pub use backend::{ChatBackend, DiagnosticsBackend};
pub use config::ChatConfig;
pub use error::{KbchatError, Result};
pub use notifier::{Notice, NoticeId, NoticeKind, StatusNotifier};
