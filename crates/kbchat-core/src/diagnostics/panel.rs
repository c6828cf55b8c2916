//! Display-ready panels built from diagnostics snapshots.

use std::collections::BTreeMap;

use kbchat_types::{Annotation, ComprehensiveScore, CorpusStats, DocumentDetail, PageDetail};

use crate::render::escape_text;

/// Knobs for page panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelOptions {
    /// Annotations shown per group before the overflow note.
    pub preview_limit: usize,
    /// Confidence displayed when an annotation has none.
    pub default_confidence: f64,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            preview_limit: 5,
            default_confidence: 0.5,
        }
    }
}

/// Importance scores are shown with three decimals.
pub fn format_score(score: f64) -> String {
    format!("{score:.3}")
}

/// Annotation confidences are shown with two decimals.
pub fn format_confidence(confidence: f64) -> String {
    format!("{confidence:.2}")
}

fn display(text: &str) -> String {
    escape_text(text).into_owned()
}

fn count_rows(counts: &BTreeMap<String, u64>) -> Vec<CountRow> {
    counts
        .iter()
        .map(|(label, count)| CountRow {
            label: display(label),
            count: *count,
        })
        .collect()
}

/// Whatever the diagnostics panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticsPanel {
    Corpus(CorpusPanel),
    DocumentList(DocumentListPanel),
    Document(DocumentPanel),
    Page(PagePanel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRow {
    pub label: String,
    pub count: u64,
}

/// A follow-up fetch offered next to a document.
///
/// Holds the raw filename; it is a request parameter, not display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillDown {
    Detail { filename: String },
    FirstPage { filename: String },
}

impl DrillDown {
    pub fn label(&self) -> &'static str {
        match self {
            DrillDown::Detail { .. } => "detail",
            DrillDown::FirstPage { .. } => "first page",
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            DrillDown::Detail { filename } | DrillDown::FirstPage { filename } => filename,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEntry {
    pub name: String,
    pub actions: Vec<DrillDown>,
}

impl DocumentEntry {
    fn for_file(filename: &str) -> Self {
        Self {
            name: display(filename),
            actions: vec![
                DrillDown::Detail {
                    filename: filename.to_string(),
                },
                DrillDown::FirstPage {
                    filename: filename.to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPanel {
    pub total_documents: u64,
    pub total_annotations: u64,
    pub annotation_types: Vec<CountRow>,
    pub documents: Vec<DocumentEntry>,
}

impl CorpusPanel {
    pub fn from_stats(stats: &CorpusStats) -> Self {
        Self {
            total_documents: stats.total_pdfs,
            total_annotations: stats.total_annotations,
            annotation_types: count_rows(&stats.annotation_types),
            documents: stats
                .pdf_files
                .iter()
                .map(|f| DocumentEntry::for_file(f))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentListPanel {
    pub documents: Vec<DocumentEntry>,
}

impl DocumentListPanel {
    pub fn from_stats(stats: &CorpusStats) -> Self {
        Self {
            documents: stats
                .pdf_files
                .iter()
                .map(|f| DocumentEntry::for_file(f))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageScoreRow {
    pub page_number: u64,
    pub text_length: u64,
    pub basic: String,
    pub comprehensive: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPanel {
    pub filename: String,
    pub total_pages: u64,
    pub total_text_length: u64,
    pub annotation_summary: Vec<CountRow>,
    pub sample_pages: Vec<PageScoreRow>,
}

impl DocumentPanel {
    pub fn from_detail(detail: &DocumentDetail) -> Self {
        Self {
            filename: display(&detail.filename),
            total_pages: detail.total_pages,
            total_text_length: detail.total_text_length,
            annotation_summary: count_rows(&detail.annotation_summary),
            sample_pages: detail
                .sample_pages
                .iter()
                .map(|page| PageScoreRow {
                    page_number: page.page_number,
                    text_length: page.text_length,
                    basic: format_score(page.importance_score),
                    comprehensive: format_score(page.comprehensive_score.total),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationEntry {
    pub label: String,
    pub confidence: String,
}

/// Annotations of one type, truncated to the preview limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationGroup {
    pub kind: String,
    pub total: usize,
    pub entries: Vec<AnnotationEntry>,
    /// How many annotations were left out of `entries`.
    pub hidden: usize,
}

impl AnnotationGroup {
    fn build(kind: &str, annotations: &[Annotation], options: &PanelOptions) -> Self {
        let entries = annotations
            .iter()
            .take(options.preview_limit)
            .map(|annotation| AnnotationEntry {
                label: display(annotation.kind.as_deref().unwrap_or(kind)),
                confidence: format_confidence(
                    annotation.confidence.unwrap_or(options.default_confidence),
                ),
            })
            .collect::<Vec<_>>();

        Self {
            kind: display(kind),
            total: annotations.len(),
            hidden: annotations.len() - entries.len(),
            entries,
        }
    }

    /// `"... and N more"` when some annotations were left out.
    pub fn overflow_note(&self) -> Option<String> {
        (self.hidden > 0).then(|| format!("... and {} more", self.hidden))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePanel {
    pub filename: String,
    pub page_number: u64,
    pub text_preview: String,
    pub basic_score: String,
    pub comprehensive_score: String,
    /// Component scores of the composite, when the service sent them.
    pub score_components: Vec<(String, String)>,
    /// Non-empty annotation groups.
    pub groups: Vec<AnnotationGroup>,
}

impl PagePanel {
    pub fn from_detail(detail: &PageDetail, options: &PanelOptions) -> Self {
        let ComprehensiveScore { total, components } = &detail.importance_scores.comprehensive;

        Self {
            filename: display(&detail.filename),
            page_number: detail.page_number,
            text_preview: display(&detail.text_preview),
            basic_score: format_score(detail.importance_scores.basic),
            comprehensive_score: format_score(*total),
            score_components: components
                .iter()
                .map(|(name, value)| (display(name), format_score(*value)))
                .collect(),
            groups: detail
                .annotations
                .iter()
                .filter(|(_, annotations)| !annotations.is_empty())
                .map(|(kind, annotations)| AnnotationGroup::build(kind, annotations, options))
                .collect(),
        }
    }
}
