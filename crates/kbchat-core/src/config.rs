//! Chat behaviour configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::diagnostics::PanelOptions;
use crate::error::{KbchatError, Result};
use crate::session::DEFAULT_HISTORY_LIMIT;

fn default_threshold() -> f64 {
    0.5
}

fn default_context_window() -> usize {
    3
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_true() -> bool {
    true
}

fn default_notice_ttl_secs() -> u64 {
    5
}

fn default_preview_limit() -> usize {
    5
}

fn default_annotation_confidence() -> f64 {
    0.5
}

/// Tunables for the chat controller and diagnostics panels.
///
/// Deployments differ on the confidence threshold (0.5 and 0.7 are both in
/// use) and on whether recent turns are sent as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Replies with a confidence below this value show a caveat banner.
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f64,
    /// Number of recent turns sent with each request.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    /// Maximum number of turns kept in the session.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Whether requests carry a `context` field at all.
    #[serde(default = "default_true")]
    pub send_context: bool,
    /// Show the service's error text instead of the generic message.
    #[serde(default)]
    pub show_error_detail: bool,
    #[serde(default = "default_notice_ttl_secs")]
    pub notice_ttl_secs: u64,
    #[serde(default = "default_preview_limit")]
    pub annotation_preview_limit: usize,
    #[serde(default = "default_annotation_confidence")]
    pub default_annotation_confidence: f64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_threshold(),
            context_window: default_context_window(),
            history_limit: default_history_limit(),
            send_context: true,
            show_error_detail: false,
            notice_ttl_secs: default_notice_ttl_secs(),
            annotation_preview_limit: default_preview_limit(),
            default_annotation_confidence: default_annotation_confidence(),
        }
    }
}

impl ChatConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }

    pub fn without_context(mut self) -> Self {
        self.send_context = false;
        self
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs)
    }

    pub fn panel_options(&self) -> PanelOptions {
        PanelOptions {
            preview_limit: self.annotation_preview_limit,
            default_confidence: self.default_annotation_confidence,
        }
    }

    /// Checks value ranges and cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(KbchatError::config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if self.history_limit == 0 {
            return Err(KbchatError::config("history_limit must be at least 1"));
        }
        if self.context_window > self.history_limit {
            return Err(KbchatError::config(format!(
                "context_window ({}) cannot exceed history_limit ({})",
                self.context_window, self.history_limit
            )));
        }
        if !(0.0..=1.0).contains(&self.default_annotation_confidence) {
            return Err(KbchatError::config(
                "default_annotation_confidence must be within [0, 1]",
            ));
        }
        Ok(())
    }
}
