//! Self-expiring status banners.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::render::{NoticeView, escape_text};

/// Default lifetime of a banner.
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoticeId(pub Uuid);

/// A banner shown at the top of the main view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub message: String,
    pub kind: NoticeKind,
}

/// Shows banners and schedules their removal.
///
/// Every call schedules its own removal after the TTL; overlapping banners
/// are neither coalesced nor extended.
#[derive(Clone)]
pub struct StatusNotifier {
    view: Arc<dyn NoticeView>,
    ttl: Duration,
}

impl StatusNotifier {
    pub fn new(view: Arc<dyn NoticeView>) -> Self {
        Self::with_ttl(view, DEFAULT_NOTICE_TTL)
    }

    pub fn with_ttl(view: Arc<dyn NoticeView>, ttl: Duration) -> Self {
        Self { view, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Shows a banner and schedules its removal.
    ///
    /// The message is escaped like transcript text. Removal runs on the current tokio runtime. Outside a runtime the
    /// banner is shown but never dismissed.
    pub fn notify(&self, message: impl Into<String>, kind: NoticeKind) -> NoticeId {
        let notice = Notice {
            id: NoticeId(Uuid::new_v4()),
            message: escape_text(&message.into()).into_owned(),
            kind,
        };
        let id = notice.id;
        self.view.show_notice(&notice);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let view = Arc::clone(&self.view);
                let ttl = self.ttl;
                tracing::debug!(?kind, ttl_ms = ttl.as_millis() as u64, "notice scheduled");
                handle.spawn(async move {
                    tokio::time::sleep(ttl).await;
                    view.dismiss_notice(id);
                });
            }
            Err(_) => {
                tracing::warn!(?kind, "no async runtime; notice will not expire");
            }
        }

        id
    }

    pub fn info(&self, message: impl Into<String>) -> NoticeId {
        self.notify(message, NoticeKind::Info)
    }

    pub fn success(&self, message: impl Into<String>) -> NoticeId {
        self.notify(message, NoticeKind::Success)
    }

    pub fn warning(&self, message: impl Into<String>) -> NoticeId {
        self.notify(message, NoticeKind::Warning)
    }

    pub fn error(&self, message: impl Into<String>) -> NoticeId {
        self.notify(message, NoticeKind::Error)
    }
}
