//! Diagnostics view models.
//!
//! Snapshots fetched from the service are turned into display-ready panels
//! here: numbers are formatted, text is escaped and annotation groups are
//! truncated. Fetching lives in the application layer.

mod panel;

pub use panel::{
    AnnotationEntry, AnnotationGroup, CorpusPanel, CountRow, DiagnosticsPanel, DocumentEntry,
    DocumentListPanel, DocumentPanel, DrillDown, PagePanel, PageScoreRow, PanelOptions,
    format_confidence, format_score,
};
