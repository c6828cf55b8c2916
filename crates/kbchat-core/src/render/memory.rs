//! In-memory view that records every update.
//!
//! Backs headless runs and tests: transcript entries, input-lock changes,
//! banners and the diagnostics panel are all kept for inspection.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::message::{MessageHandle, RenderedMessage};
use super::view::{DiagnosticsView, NoticeView, TranscriptView};
use crate::diagnostics::DiagnosticsPanel;
use crate::notifier::{Notice, NoticeId};

#[derive(Default)]
struct Recorded {
    next_handle: u64,
    messages: Vec<(MessageHandle, RenderedMessage)>,
    removed: Vec<MessageHandle>,
    scrolls: usize,
    input_locked: bool,
    lock_changes: Vec<bool>,
    input_clears: usize,
    active_notices: Vec<Notice>,
    notice_history: Vec<Notice>,
    panel: Option<DiagnosticsPanel>,
    panel_updates: usize,
}

#[derive(Default)]
pub struct MemoryView {
    inner: Mutex<Recorded>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entries currently in the transcript, in insertion order.
    pub fn messages(&self) -> Vec<RenderedMessage> {
        self.recorded()
            .messages
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn message(&self, handle: MessageHandle) -> Option<RenderedMessage> {
        self.recorded()
            .messages
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, message)| message.clone())
    }

    pub fn last_message(&self) -> Option<RenderedMessage> {
        self.recorded()
            .messages
            .last()
            .map(|(_, message)| message.clone())
    }

    pub fn removed(&self) -> Vec<MessageHandle> {
        self.recorded().removed.clone()
    }

    pub fn scroll_count(&self) -> usize {
        self.recorded().scrolls
    }

    pub fn input_locked(&self) -> bool {
        self.recorded().input_locked
    }

    /// Every lock/unlock call, in order.
    pub fn lock_changes(&self) -> Vec<bool> {
        self.recorded().lock_changes.clone()
    }

    pub fn input_clears(&self) -> usize {
        self.recorded().input_clears
    }

    pub fn active_notices(&self) -> Vec<Notice> {
        self.recorded().active_notices.clone()
    }

    /// Every banner ever shown, including expired ones.
    pub fn notice_history(&self) -> Vec<Notice> {
        self.recorded().notice_history.clone()
    }

    pub fn panel(&self) -> Option<DiagnosticsPanel> {
        self.recorded().panel.clone()
    }

    pub fn panel_updates(&self) -> usize {
        self.recorded().panel_updates
    }
}

impl TranscriptView for MemoryView {
    fn insert(&self, message: RenderedMessage) -> MessageHandle {
        let mut recorded = self.recorded();
        recorded.next_handle += 1;
        let handle = MessageHandle(recorded.next_handle);
        recorded.messages.push((handle, message));
        handle
    }

    fn remove(&self, handle: MessageHandle) {
        let mut recorded = self.recorded();
        let before = recorded.messages.len();
        recorded.messages.retain(|(h, _)| *h != handle);
        if recorded.messages.len() != before {
            recorded.removed.push(handle);
        }
    }

    fn scroll_to_bottom(&self) {
        self.recorded().scrolls += 1;
    }

    fn set_input_locked(&self, locked: bool) {
        let mut recorded = self.recorded();
        recorded.input_locked = locked;
        recorded.lock_changes.push(locked);
    }

    fn clear_input(&self) {
        self.recorded().input_clears += 1;
    }
}

impl NoticeView for MemoryView {
    fn show_notice(&self, notice: &Notice) {
        let mut recorded = self.recorded();
        recorded.active_notices.push(notice.clone());
        recorded.notice_history.push(notice.clone());
    }

    fn dismiss_notice(&self, id: NoticeId) {
        self.recorded().active_notices.retain(|n| n.id != id);
    }
}

impl DiagnosticsView for MemoryView {
    fn replace_panel(&self, panel: DiagnosticsPanel) {
        let mut recorded = self.recorded();
        recorded.panel = Some(panel);
        recorded.panel_updates += 1;
    }
}
