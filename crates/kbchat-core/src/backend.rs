//! Collaborator interfaces for the knowledge-base service.
//!
//! The service is opaque: these traits only describe the requests the client
//! makes. Implementations map transport problems to
//! [`KbchatError::Transport`](crate::error::KbchatError::Transport) and
//! payloads with an `error` field to
//! [`KbchatError::Application`](crate::error::KbchatError::Application).

use async_trait::async_trait;
use kbchat_types::{ChatReply, ChatRequest, CorpusStats, DocumentDetail, PageDetail};

use crate::error::Result;

/// The chat endpoint.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one message and returns the reply envelope as received.
    ///
    /// `success: false` replies are returned as `Ok`; interpreting them is
    /// the caller's job.
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply>;
}

/// The three diagnostics endpoints.
#[async_trait]
pub trait DiagnosticsBackend: Send + Sync {
    async fn corpus_stats(&self) -> Result<CorpusStats>;

    async fn document_detail(&self, filename: &str) -> Result<DocumentDetail>;

    /// `page_index` is zero-based.
    async fn page_detail(&self, filename: &str, page_index: u32) -> Result<PageDetail>;
}
