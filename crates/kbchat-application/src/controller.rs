//! Chat controller: one submit cycle from utterance to rendered reply.
//!
//! The cycle is `Idle → Submitting → AwaitingResponse → Idle`. The
//! processing flag is taken synchronously before the first await, and a
//! scoped guard releases it (and unlocks input) on every exit path.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use kbchat_core::render::{MessageRenderer, Sender, TranscriptView};
use kbchat_core::session::{ChatPhase, Rejection, SessionFlags, SessionState, lock_session};
use kbchat_core::{ChatBackend, ChatConfig, KbchatError, StatusNotifier};
use kbchat_types::{ChatReply, ChatRequest, ConversationTurn};

use crate::messages::Locale;

/// How a submission ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing happened: empty input or a request already in flight.
    Rejected(Rejection),
    /// A reply was rendered and committed to history.
    Answered {
        confidence: Option<f64>,
        warned: bool,
    },
    /// The service reported a failure. No turn was committed.
    ServiceError { message: String },
    /// The request failed or the reply could not be read. No turn was committed.
    TransportError { message: String },
}

impl SubmitOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, SubmitOutcome::Answered { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            SubmitOutcome::ServiceError { .. } | SubmitOutcome::TransportError { .. }
        )
    }
}

/// Releases the processing flag and the input lock when dropped.
struct TurnGuard<'a> {
    session: &'a Mutex<SessionState>,
    transcript: &'a dyn TranscriptView,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        lock_session(self.session).end_turn();
        self.transcript.set_input_locked(false);
    }
}

/// Drives chat turns against a [`ChatBackend`].
///
/// One controller owns one session; share it behind an `Arc` to submit from
/// spawned tasks.
pub struct ChatController {
    backend: Arc<dyn ChatBackend>,
    transcript: Arc<dyn TranscriptView>,
    renderer: MessageRenderer,
    notifier: StatusNotifier,
    session: Mutex<SessionState>,
    config: ChatConfig,
}

impl ChatController {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        transcript: Arc<dyn TranscriptView>,
        notifier: StatusNotifier,
        config: ChatConfig,
    ) -> Self {
        Self {
            backend,
            renderer: MessageRenderer::new(Arc::clone(&transcript)),
            transcript,
            notifier,
            session: Mutex::new(SessionState::new(config.history_limit)),
            config,
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn flags(&self) -> SessionFlags {
        lock_session(&self.session).flags()
    }

    pub fn phase(&self) -> ChatPhase {
        lock_session(&self.session).phase()
    }

    /// A copy of the committed turns, oldest first.
    pub fn history(&self) -> Vec<ConversationTurn> {
        lock_session(&self.session).history().turns().to_vec()
    }

    /// Runs one turn.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let utterance = text.trim();

        let begun = lock_session(&self.session).begin_turn(utterance);
        if let Err(rejection) = begun {
            tracing::debug!(%rejection, "submit rejected");
            return SubmitOutcome::Rejected(rejection);
        }
        let _guard = TurnGuard {
            session: &self.session,
            transcript: self.transcript.as_ref(),
        };

        let locale = Locale::for_utterance(utterance);
        self.renderer.render(utterance, Sender::User);
        self.transcript.clear_input();
        self.transcript.set_input_locked(true);
        let placeholder = self.renderer.render_placeholder(locale.thinking());

        let request = {
            let mut session = lock_session(&self.session);
            let context = self
                .config
                .send_context
                .then(|| session.recent_context(self.config.context_window).to_vec());
            session.mark_awaiting();
            ChatRequest {
                message: utterance.to_string(),
                context,
            }
        };
        tracing::debug!(
            chars = utterance.chars().count(),
            context_turns = request.context.as_ref().map_or(0, Vec::len),
            "submit accepted"
        );

        let result = self.backend.send(&request).await;
        self.renderer.remove(placeholder);

        match result {
            Ok(reply) if reply.success => self.on_reply(utterance, reply, locale),
            Ok(reply) => self.on_service_error(reply.error.as_deref().unwrap_or_default(), locale),
            Err(err) if err.is_application() => self.on_service_error(&err.user_message(), locale),
            Err(err) => self.on_transport_error(&err, locale),
        }
    }

    fn on_reply(&self, utterance: &str, reply: ChatReply, locale: Locale) -> SubmitOutcome {
        let Some(response) = reply.response.as_deref() else {
            let err = KbchatError::malformed("chat reply", "successful reply without a response");
            return self.on_transport_error(&err, locale);
        };

        if let Some(sources) = &reply.sources {
            tracing::debug!(%sources, "reply sources");
        }
        self.renderer.render_answer(response, reply.source_labels());

        let timestamp = reply
            .timestamp
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339());
        lock_session(&self.session).commit_turn(utterance, response, timestamp);

        let warned = reply
            .confidence
            .is_some_and(|confidence| confidence < self.config.confidence_threshold);
        if warned {
            self.notifier.warning(locale.low_confidence());
        }

        SubmitOutcome::Answered {
            confidence: reply.confidence,
            warned,
        }
    }

    fn on_service_error(&self, detail: &str, locale: Locale) -> SubmitOutcome {
        tracing::warn!(error = detail, "chat service returned an error");
        let text = if self.config.show_error_detail && !detail.is_empty() {
            locale.application_error_detail(detail)
        } else {
            locale.application_error().to_string()
        };
        self.renderer.render(&text, Sender::Bot);
        SubmitOutcome::ServiceError {
            message: detail.to_string(),
        }
    }

    fn on_transport_error(&self, err: &KbchatError, locale: Locale) -> SubmitOutcome {
        tracing::error!(error = %err, "chat request failed");
        self.renderer.render(locale.transport_error(), Sender::Bot);
        SubmitOutcome::TransportError {
            message: err.to_string(),
        }
    }
}
