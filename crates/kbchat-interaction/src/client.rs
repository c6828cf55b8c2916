//! HttpServiceClient - REST client for the knowledge-base service.
//!
//! Implements both collaborator traits over plain JSON endpoints:
//! - `POST {chat_path}` for chat
//! - `GET /debug/stats`, `/debug/pdf/{file}`, `/debug/annotations/{file}/{page}`
//! - `GET {health_path}` for the health probe

use std::time::Duration;

use async_trait::async_trait;
use kbchat_core::{ChatBackend, DiagnosticsBackend, KbchatError, Result};
use kbchat_types::{ChatReply, ChatRequest, CorpusStats, DocumentDetail, HealthStatus, PageDetail};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::EndpointConfig;

/// Client for the chat, diagnostics and health endpoints.
#[derive(Clone)]
pub struct HttpServiceClient {
    client: Client,
    base_url: Url,
    chat_path: String,
    health_path: String,
}

impl HttpServiceClient {
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|err| {
            KbchatError::config(format!("Invalid base URL '{}': {err}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(KbchatError::config(format!(
                "Base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|err| KbchatError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            chat_path: config.chat_path.clone(),
            health_path: config.health_path.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint<I, S>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| KbchatError::config("Base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn configured_path(&self, path: &str) -> Result<Url> {
        self.endpoint(path.split('/').filter(|segment| !segment.is_empty()))
    }

    /// Checks the service health endpoint.
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.configured_path(&self.health_path)?;
        let value = self.get_json("health", url).await?;
        let health: HealthStatus = decode("health", value)?;
        if !health.is_healthy() {
            return Err(KbchatError::application(if health.message.is_empty() {
                format!("service status: {}", health.status)
            } else {
                health.message.clone()
            }));
        }
        Ok(health)
    }

    async fn get_json(&self, context: &str, url: Url) -> Result<Value> {
        tracing::debug!(%url, context, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| transport_error(context, err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| transport_error(context, err))?;

        let value = parse_body::<Value>(context, status, &body)?;
        check_error_field(&value)?;
        Ok(value)
    }
}

fn transport_error(context: &str, err: reqwest::Error) -> KbchatError {
    KbchatError::transport(format!("{context} request failed: {err}"))
}

/// Parses a response body. Unparseable bodies are transport failures when the
/// status was an HTTP error, and malformed payloads otherwise.
fn parse_body<T: DeserializeOwned>(context: &str, status: StatusCode, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|err| {
        if status.is_success() {
            KbchatError::malformed(context, err.to_string())
        } else {
            KbchatError::transport(format!("{context} request failed with HTTP {status}"))
        }
    })
}

/// A payload with a non-null `error` field is an application failure.
fn check_error_field(value: &Value) -> Result<()> {
    match value.get("error") {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(message)) => Err(KbchatError::application(message.clone())),
        Some(other) => Err(KbchatError::application(other.to_string())),
    }
}

fn decode<T: DeserializeOwned>(context: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| KbchatError::malformed(context, err.to_string()))
}

#[async_trait]
impl ChatBackend for HttpServiceClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.configured_path(&self.chat_path)?;
        tracing::info!(
            %url,
            context_turns = request.context.as_ref().map_or(0, Vec::len),
            "sending chat request"
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| transport_error("chat", err))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| transport_error("chat", err))?;

        parse_body("chat reply", status, &body)
    }
}

#[async_trait]
impl DiagnosticsBackend for HttpServiceClient {
    async fn corpus_stats(&self) -> Result<CorpusStats> {
        let url = self.endpoint(["debug", "stats"])?;
        decode("corpus stats", self.get_json("corpus stats", url).await?)
    }

    async fn document_detail(&self, filename: &str) -> Result<DocumentDetail> {
        let url = self.endpoint(["debug", "pdf", filename])?;
        decode("document detail", self.get_json("document detail", url).await?)
    }

    async fn page_detail(&self, filename: &str, page_index: u32) -> Result<PageDetail> {
        let page = page_index.to_string();
        let url = self.endpoint(["debug", "annotations", filename, page.as_str()])?;
        decode("page detail", self.get_json("page detail", url).await?)
    }
}
