//! Message renderer: raw text in, escaped and segmented transcript entries out.

use std::borrow::Cow;
use std::sync::Arc;

use super::message::{Emphasis, MessageHandle, RenderedMessage, Sender};
use super::view::TranscriptView;
use crate::followup::is_follow_up;
use crate::language::segment;

/// Neutralizes characters a terminal or markup layer would interpret.
///
/// Control characters other than newline and tab, and bidirectional
/// override/isolate characters, are replaced by their `\u{..}` escape so
/// they show up as inert text.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if needs_escape(c) {
            escaped.extend(c.escape_unicode());
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

fn needs_escape(c: char) -> bool {
    (c.is_control() && c != '\n' && c != '\t')
        || matches!(c, '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}')
}

/// Builds transcript entries and inserts them into a [`TranscriptView`].
#[derive(Clone)]
pub struct MessageRenderer {
    view: Arc<dyn TranscriptView>,
}

impl MessageRenderer {
    pub fn new(view: Arc<dyn TranscriptView>) -> Self {
        Self { view }
    }

    /// Builds an entry without inserting it.
    pub fn compose(text: &str, sender: Sender, is_transient: bool) -> RenderedMessage {
        let emphasis = if sender == Sender::User && is_follow_up(text) {
            Emphasis::FollowUp
        } else {
            Emphasis::Normal
        };

        RenderedMessage {
            sender,
            segments: segment(&escape_text(&text.replace("\r\n", "\n"))),
            is_transient,
            emphasis,
            sources: Vec::new(),
        }
    }

    /// Renders a user or bot message.
    pub fn render(&self, text: &str, sender: Sender) -> MessageHandle {
        self.insert(Self::compose(text, sender, false))
    }

    /// Renders a bot response with its source labels.
    pub fn render_answer(&self, text: &str, sources: Vec<String>) -> MessageHandle {
        let mut message = Self::compose(text, Sender::Bot, false);
        message.sources = sources
            .iter()
            .map(|source| escape_text(source).into_owned())
            .collect();
        self.insert(message)
    }

    /// Renders a transient bot placeholder.
    pub fn render_placeholder(&self, text: &str) -> MessageHandle {
        self.insert(Self::compose(text, Sender::Bot, true))
    }

    pub fn remove(&self, handle: MessageHandle) {
        self.view.remove(handle);
    }

    fn insert(&self, message: RenderedMessage) -> MessageHandle {
        let handle = self.view.insert(message);
        self.view.scroll_to_bottom();
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{LanguageTag, Segment};
    use crate::render::MemoryView;

    fn renderer() -> (Arc<MemoryView>, MessageRenderer) {
        let view = Arc::new(MemoryView::new());
        let renderer = MessageRenderer::new(view.clone());
        (view, renderer)
    }

    #[test]
    fn escapes_terminal_control_sequences() {
        assert_eq!(escape_text("\u{1b}[31mred"), "\\u{1b}[31mred");
        assert_eq!(escape_text("a\u{202E}b"), "a\\u{202e}b");
        assert!(matches!(escape_text("line\n\tok"), Cow::Borrowed(_)));
    }

    #[test]
    fn japanese_response_is_one_japanese_segment() {
        let message = MessageRenderer::compose("こんにちは！", Sender::Bot, false);
        assert_eq!(
            message.segments,
            vec![Segment::new("こんにちは！", LanguageTag::Japanese)]
        );
        assert!(!message.is_transient);
    }

    #[test]
    fn mixed_response_is_split_per_line() {
        let message = MessageRenderer::compose("失敗を恐れるな\nDo not fear failure.", Sender::Bot, false);
        assert_eq!(message.segments.len(), 2);
        assert_eq!(message.segments[1].tag, LanguageTag::English);
    }

    #[test]
    fn crlf_line_breaks_split_like_lf() {
        let message = MessageRenderer::compose("日本語の説明\r\nThis is English.\r\n", Sender::Bot, false);
        assert_eq!(
            message.segments,
            vec![
                Segment::new("日本語の説明", LanguageTag::Japanese),
                Segment::new("This is English.", LanguageTag::English),
            ]
        );

        let english = MessageRenderer::compose("Hello\r\nWorld", Sender::Bot, false);
        assert_eq!(english.plain_text(), "Hello\nWorld");
    }

    #[test]
    fn lone_carriage_return_is_still_escaped() {
        let message = MessageRenderer::compose("a\rb", Sender::Bot, false);
        assert_eq!(message.plain_text(), "a\\u{d}b");
    }

    #[test]
    fn only_user_follow_ups_are_emphasized() {
        let user = MessageRenderer::compose("Why?", Sender::User, false);
        let bot = MessageRenderer::compose("Why?", Sender::Bot, false);
        assert_eq!(user.emphasis, Emphasis::FollowUp);
        assert_eq!(bot.emphasis, Emphasis::Normal);
    }

    #[test]
    fn markup_never_reaches_the_view_unescaped() {
        let (view, renderer) = renderer();
        renderer.render("evil \u{1b}]0;title\u{7} text", Sender::Bot);

        let message = view.last_message().unwrap();
        assert!(!message.plain_text().contains('\u{1b}'));
        assert!(!message.plain_text().contains('\u{7}'));
    }

    #[test]
    fn every_insert_scrolls_to_bottom() {
        let (view, renderer) = renderer();
        renderer.render("one", Sender::User);
        renderer.render_placeholder("thinking");
        assert_eq!(view.scroll_count(), 2);
    }

    #[test]
    fn placeholder_can_be_removed_by_handle() {
        let (view, renderer) = renderer();
        renderer.render("question", Sender::User);
        let handle = renderer.render_placeholder("🤔 Thinking...");
        assert!(view.message(handle).unwrap().is_transient);

        renderer.remove(handle);

        assert!(view.message(handle).is_none());
        assert_eq!(view.messages().len(), 1);
    }

    #[test]
    fn answers_carry_escaped_sources() {
        let (view, renderer) = renderer();
        renderer.render_answer("ok", vec!["a\u{1b}.pdf".to_string()]);
        assert_eq!(view.last_message().unwrap().sources, vec!["a\\u{1b}.pdf"]);
    }
}
