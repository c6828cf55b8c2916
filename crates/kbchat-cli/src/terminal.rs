//! Terminal implementation of the view traits.
//!
//! Output is append-only: transcript entries, banners and diagnostics panels
//! are printed as they arrive. Placeholders are tracked by handle so their
//! removal is recognized, but nothing is erased from the screen.

use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use colored::Colorize;
use kbchat_core::diagnostics::{AnnotationGroup, DiagnosticsPanel, DocumentEntry};
use kbchat_core::language::LanguageTag;
use kbchat_core::render::{
    DiagnosticsView, Emphasis, MessageHandle, NoticeView, RenderedMessage, Sender, TranscriptView,
};
use kbchat_core::{Notice, NoticeId, NoticeKind};

#[derive(Default)]
struct Transcript {
    next_handle: u64,
    transient: HashSet<MessageHandle>,
}

#[derive(Default)]
pub struct TerminalView {
    transcript: Mutex<Transcript>,
    input_locked: AtomicBool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a chat request is in flight.
    pub fn input_locked(&self) -> bool {
        self.input_locked.load(Ordering::SeqCst)
    }

    /// Clears the screen.
    pub fn clear(&self) {
        let _transcript = self.transcript();
        print!("\x1b[2J\x1b[H");
        let _ = io::stdout().flush();
    }

    fn transcript(&self) -> MutexGuard<'_, Transcript> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn print_message(message: &RenderedMessage) {
    let marker = match (message.sender, message.emphasis) {
        (Sender::User, Emphasis::FollowUp) => "↩ ".yellow().to_string(),
        (Sender::User, Emphasis::Normal) => "> ".green().to_string(),
        (Sender::Bot, _) => String::new(),
    };

    for (index, segment) in message.segments.iter().enumerate() {
        let prefix = if index == 0 { marker.as_str() } else { "  " };
        for line in segment.text.lines() {
            let styled = match (message.sender, message.is_transient, segment.tag) {
                (_, true, _) => line.bright_black().italic(),
                (Sender::User, _, _) => line.green(),
                (Sender::Bot, _, LanguageTag::Japanese) => line.bright_blue(),
                (Sender::Bot, _, LanguageTag::English) => line.cyan(),
            };
            println!("{prefix}{styled}");
        }
    }

    if !message.sources.is_empty() {
        println!("{}", format!("  sources: {}", message.sources.join(", ")).dimmed());
    }
}

impl TranscriptView for TerminalView {
    fn insert(&self, message: RenderedMessage) -> MessageHandle {
        let mut transcript = self.transcript();
        transcript.next_handle += 1;
        let handle = MessageHandle(transcript.next_handle);
        if message.is_transient {
            transcript.transient.insert(handle);
        }
        print_message(&message);
        handle
    }

    fn remove(&self, handle: MessageHandle) {
        if self.transcript().transient.remove(&handle) {
            tracing::trace!(?handle, "placeholder removed");
        }
    }

    fn scroll_to_bottom(&self) {
        let _ = io::stdout().flush();
    }

    fn set_input_locked(&self, locked: bool) {
        self.input_locked.store(locked, Ordering::SeqCst);
    }

    fn clear_input(&self) {
        // The line editor clears its buffer on submit.
    }
}

impl NoticeView for TerminalView {
    fn show_notice(&self, notice: &Notice) {
        let _transcript = self.transcript();
        let line = match notice.kind {
            NoticeKind::Info => format!("[info] {}", notice.message).bright_black(),
            NoticeKind::Success => format!("[ok] {}", notice.message).green(),
            NoticeKind::Warning => format!("[warn] {}", notice.message).yellow(),
            NoticeKind::Error => format!("[error] {}", notice.message).red(),
        };
        println!("{line}");
    }

    fn dismiss_notice(&self, id: NoticeId) {
        tracing::trace!(id = %id.0, "notice expired");
    }
}

impl DiagnosticsView for TerminalView {
    fn replace_panel(&self, panel: DiagnosticsPanel) {
        let _transcript = self.transcript();
        for line in panel_lines(&panel) {
            println!("{line}");
        }
        let _ = io::stdout().flush();
    }
}

fn document_line(entry: &DocumentEntry) -> String {
    let actions: Vec<_> = entry.actions.iter().map(|action| action.label()).collect();
    format!("  - {} [{}]", entry.name, actions.join(" | "))
}

fn group_lines(group: &AnnotationGroup, lines: &mut Vec<String>) {
    lines.push(format!("  {} ({})", group.kind, group.total));
    for entry in &group.entries {
        lines.push(format!("    - {} ({})", entry.label, entry.confidence));
    }
    if let Some(note) = group.overflow_note() {
        lines.push(format!("    {note}"));
    }
}

/// Plain-text rendering of a diagnostics panel as an indented tree.
pub fn panel_lines(panel: &DiagnosticsPanel) -> Vec<String> {
    let mut lines = Vec::new();
    match panel {
        DiagnosticsPanel::Corpus(corpus) => {
            lines.push("Corpus statistics".to_string());
            lines.push(format!("  documents: {}", corpus.total_documents));
            lines.push(format!("  annotations: {}", corpus.total_annotations));
            lines.push("  annotation types:".to_string());
            for row in &corpus.annotation_types {
                lines.push(format!("    {}: {}", row.label, row.count));
            }
            lines.push("  documents:".to_string());
            lines.extend(corpus.documents.iter().map(|entry| format!("  {}", document_line(entry))));
        }
        DiagnosticsPanel::DocumentList(list) => {
            lines.push(format!("Documents ({})", list.documents.len()));
            lines.extend(list.documents.iter().map(document_line));
        }
        DiagnosticsPanel::Document(document) => {
            lines.push(format!("Document {}", document.filename));
            lines.push(format!("  pages: {}", document.total_pages));
            lines.push(format!("  text length: {}", document.total_text_length));
            lines.push("  annotation summary:".to_string());
            for row in &document.annotation_summary {
                lines.push(format!("    {}: {}", row.label, row.count));
            }
            lines.push("  sample pages:".to_string());
            for page in &document.sample_pages {
                lines.push(format!(
                    "    p.{} chars={} basic={} comprehensive={}",
                    page.page_number, page.text_length, page.basic, page.comprehensive
                ));
            }
        }
        DiagnosticsPanel::Page(page) => {
            lines.push(format!("Page {} of {}", page.page_number, page.filename));
            lines.push(format!("  basic: {}", page.basic_score));
            lines.push(format!("  comprehensive: {}", page.comprehensive_score));
            for (name, value) in &page.score_components {
                lines.push(format!("    {name}: {value}"));
            }
            lines.push("  preview:".to_string());
            lines.extend(page.text_preview.lines().map(|line| format!("    {line}")));
            if page.groups.is_empty() {
                lines.push("  no annotations".to_string());
            }
            for group in &page.groups {
                group_lines(group, &mut lines);
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbchat_core::diagnostics::{AnnotationEntry, DrillDown, DocumentListPanel, PagePanel};

    #[test]
    fn document_list_shows_both_actions() {
        let panel = DiagnosticsPanel::DocumentList(DocumentListPanel {
            documents: vec![DocumentEntry {
                name: "a.pdf".to_string(),
                actions: vec![
                    DrillDown::Detail {
                        filename: "a.pdf".to_string(),
                    },
                    DrillDown::FirstPage {
                        filename: "a.pdf".to_string(),
                    },
                ],
            }],
        });

        assert_eq!(
            panel_lines(&panel),
            vec!["Documents (1)", "  - a.pdf [detail | first page]"]
        );
    }

    #[test]
    fn page_panel_prints_overflow_note() {
        let entry = AnnotationEntry {
            label: "highlight".to_string(),
            confidence: "0.90".to_string(),
        };
        let panel = DiagnosticsPanel::Page(PagePanel {
            filename: "a.pdf".to_string(),
            page_number: 1,
            text_preview: "intro".to_string(),
            basic_score: "0.100".to_string(),
            comprehensive_score: "0.200".to_string(),
            score_components: Vec::new(),
            groups: vec![AnnotationGroup {
                kind: "highlight".to_string(),
                total: 6,
                entries: vec![entry; 5],
                hidden: 1,
            }],
        });

        let lines = panel_lines(&panel);
        assert_eq!(lines.last().map(String::as_str), Some("    ... and 1 more"));
        assert_eq!(lines.iter().filter(|l| l.starts_with("    - ")).count(), 5);
    }

    #[test]
    fn placeholder_handles_are_tracked() {
        let view = TerminalView::new();
        let handle = view.insert(RenderedMessage {
            sender: Sender::Bot,
            segments: Vec::new(),
            is_transient: true,
            emphasis: Emphasis::Normal,
            sources: Vec::new(),
        });
        assert!(view.transcript().transient.contains(&handle));

        view.remove(handle);
        assert!(view.transcript().transient.is_empty());
    }

    #[test]
    fn input_lock_is_observable() {
        let view = TerminalView::new();
        view.set_input_locked(true);
        assert!(view.input_locked());
        view.set_input_locked(false);
        assert!(!view.input_locked());
    }
}
