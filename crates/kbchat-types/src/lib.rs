//! Wire types exchanged with the knowledge-base service.
//!
//! Every payload here is a plain serde structure. Interpretation of the
//! payloads (success flags, `error` fields, defaults) belongs to the crates
//! that consume them.

pub mod chat;
pub mod diagnostics;

pub use chat::{ChatReply, ChatRequest, ConversationTurn, HealthStatus};
pub use diagnostics::{
    Annotation, ComprehensiveScore, CorpusStats, DocumentDetail, ImportanceScores, PageDetail,
    PageSummary, ScoreShapeError,
};
