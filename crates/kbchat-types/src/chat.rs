//! Chat endpoint payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One committed exchange: a user utterance and the service's response.
///
/// On the wire the utterance travels as `message`, matching the shape the
/// service stores in its own session history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// What the user typed.
    #[serde(rename = "message")]
    pub utterance: String,
    /// What the service answered.
    pub response: String,
    /// When the turn was committed (RFC 3339).
    pub timestamp: String,
}

impl ConversationTurn {
    pub fn new(
        utterance: impl Into<String>,
        response: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            utterance: utterance.into(),
            response: response.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Recent turns sent as context. Omitted entirely when the deployment
    /// does not accept context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<ConversationTurn>>,
}

/// Body returned by `POST /chat`.
///
/// Only `success` is always present; everything else depends on the outcome
/// and on the deployment (`confidence` and `sources` are optional
/// enrichments).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ChatReply {
    /// Builds a successful reply. Mostly useful for tests and mock backends.
    pub fn answered(response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: Some(response.into()),
            ..Self::default()
        }
    }

    /// Builds a failed reply carrying the service's error text.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Source labels, when `sources` is a list of non-empty strings.
    ///
    /// Any other shape yields an empty list; sources are informational only.
    pub fn source_labels(&self) -> Vec<String> {
        match &self.sources {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Body returned by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
