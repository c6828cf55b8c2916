//! Fixed user-facing strings for the chat flow.

use kbchat_core::language::contains_japanese;

/// Language used for placeholder, error and caveat texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    Japanese,
    English,
}

impl Locale {
    /// A Japanese utterance gets Japanese strings; anything else gets English.
    pub fn for_utterance(utterance: &str) -> Self {
        if contains_japanese(utterance) {
            Locale::Japanese
        } else {
            Locale::English
        }
    }

    pub fn thinking(self) -> &'static str {
        match self {
            Locale::Japanese => "🤔 考え中...",
            Locale::English => "🤔 Thinking...",
        }
    }

    pub fn application_error(self) -> &'static str {
        match self {
            Locale::Japanese => "申し訳ございません。エラーが発生しました。",
            Locale::English => "Sorry, something went wrong.",
        }
    }

    /// The service's own error text, for deployments that expose it.
    pub fn application_error_detail(self, detail: &str) -> String {
        match self {
            Locale::Japanese => format!("エラー: {detail}"),
            Locale::English => format!("Error: {detail}"),
        }
    }

    pub fn transport_error(self) -> &'static str {
        match self {
            Locale::Japanese => "申し訳ございません。通信エラーが発生しました。",
            Locale::English => "Sorry, a communication error occurred.",
        }
    }

    pub fn low_confidence(self) -> &'static str {
        match self {
            Locale::Japanese => "この回答は信頼度が低い可能性があります。",
            Locale::English => "This answer may be unreliable.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_follows_the_utterance() {
        assert_eq!(Locale::for_utterance("こんにちは"), Locale::Japanese);
        assert_eq!(Locale::for_utterance("PDFの要約"), Locale::Japanese);
        assert_eq!(Locale::for_utterance("hello"), Locale::English);
        assert_eq!(Locale::for_utterance("123"), Locale::English);
    }

    #[test]
    fn detail_embeds_service_text() {
        assert_eq!(
            Locale::Japanese.application_error_detail("PDF not found"),
            "エラー: PDF not found"
        );
    }
}
