//! View traits implemented by a presentation layer.
//!
//! All methods take `&self`; implementations use interior mutability so a
//! single view can be shared between the chat controller, the status
//! notifier's timers and the diagnostics pipeline.

use super::message::{MessageHandle, RenderedMessage};
use crate::diagnostics::DiagnosticsPanel;
use crate::notifier::{Notice, NoticeId};

/// The chat transcript and its input controls.
pub trait TranscriptView: Send + Sync {
    /// Appends an entry and returns a handle for later removal.
    fn insert(&self, message: RenderedMessage) -> MessageHandle;

    /// Removes an entry. Unknown handles are ignored.
    fn remove(&self, handle: MessageHandle);

    fn scroll_to_bottom(&self);

    /// Disables (or re-enables) the input field and send control.
    fn set_input_locked(&self, locked: bool);

    fn clear_input(&self);
}

/// Transient status banners at the top of the main view.
pub trait NoticeView: Send + Sync {
    fn show_notice(&self, notice: &Notice);

    /// Removes a banner. Already-removed ids are ignored.
    fn dismiss_notice(&self, id: NoticeId);
}

/// The single diagnostics panel. Each call replaces the previous panel wholesale.
pub trait DiagnosticsView: Send + Sync {
    fn replace_panel(&self, panel: DiagnosticsPanel);
}
