//! Diagnostics stages against an in-memory corpus.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kbchat_application::DiagnosticsPipeline;
use kbchat_core::diagnostics::{DiagnosticsPanel, DrillDown, PanelOptions};
use kbchat_core::render::MemoryView;
use kbchat_core::{DiagnosticsBackend, KbchatError, NoticeKind, Result, StatusNotifier};
use kbchat_types::{
    Annotation, ComprehensiveScore, CorpusStats, DocumentDetail, ImportanceScores, PageDetail,
    PageSummary,
};

struct FakeCorpus {
    page_requests: Mutex<Vec<(String, u32)>>,
}

impl FakeCorpus {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            page_requests: Mutex::new(Vec::new()),
        })
    }
}

fn highlights(n: usize) -> Vec<Annotation> {
    (0..n)
        .map(|_| Annotation {
            kind: Some("highlight".to_string()),
            confidence: Some(0.876),
        })
        .collect()
}

#[async_trait]
impl DiagnosticsBackend for FakeCorpus {
    async fn corpus_stats(&self) -> Result<CorpusStats> {
        Ok(CorpusStats {
            total_pdfs: 2,
            total_annotations: 10,
            annotation_types: BTreeMap::from([
                ("highlight".to_string(), 7),
                ("underline".to_string(), 3),
            ]),
            pdf_files: vec!["企業参謀.pdf".to_string(), "notes.pdf".to_string()],
        })
    }

    async fn document_detail(&self, filename: &str) -> Result<DocumentDetail> {
        if filename == "broken.pdf" {
            return Err(KbchatError::malformed("document detail", "missing field `total_pages`"));
        }
        Ok(DocumentDetail {
            filename: filename.to_string(),
            total_pages: 12,
            total_text_length: 34_567,
            annotation_summary: BTreeMap::from([("highlight".to_string(), 7)]),
            sample_pages: vec![PageSummary {
                page_number: 1,
                text_length: 2_000,
                importance_score: 0.5,
                comprehensive_score: ComprehensiveScore {
                    total: 0.123456,
                    components: BTreeMap::from([("annotation".to_string(), 0.8)]),
                },
            }],
        })
    }

    async fn page_detail(&self, filename: &str, page_index: u32) -> Result<PageDetail> {
        self.page_requests
            .lock()
            .unwrap()
            .push((filename.to_string(), page_index));
        Ok(PageDetail {
            filename: filename.to_string(),
            page_number: u64::from(page_index) + 1,
            text_preview: "第1章 <b>戦略</b>".to_string(),
            importance_scores: ImportanceScores {
                basic: 0.25,
                comprehensive: ComprehensiveScore::scalar(0.75),
            },
            annotations: BTreeMap::from([
                ("highlight".to_string(), highlights(7)),
                ("underline".to_string(), vec![Annotation::default(); 3]),
            ]),
        })
    }
}

fn build(backend: Arc<FakeCorpus>) -> (Arc<MemoryView>, DiagnosticsPipeline) {
    let view = Arc::new(MemoryView::new());
    let pipeline = DiagnosticsPipeline::new(
        backend,
        view.clone(),
        StatusNotifier::new(view.clone()),
        PanelOptions::default(),
    );
    (view, pipeline)
}

#[tokio::test]
async fn corpus_panel_lists_documents_with_actions() {
    let (view, pipeline) = build(FakeCorpus::new());

    pipeline.load_corpus_stats().await.unwrap();

    let Some(DiagnosticsPanel::Corpus(panel)) = view.panel() else {
        panic!("expected corpus panel");
    };
    assert_eq!(panel.total_documents, 2);
    assert_eq!(panel.annotation_types.len(), 2);
    assert_eq!(panel.documents[0].name, "企業参謀.pdf");
    let labels: Vec<_> = panel.documents[0].actions.iter().map(DrillDown::label).collect();
    assert_eq!(labels, vec!["detail", "first page"]);
}

#[tokio::test]
async fn document_panel_formats_scores_to_three_decimals() {
    let (view, pipeline) = build(FakeCorpus::new());

    pipeline.load_document("notes.pdf").await.unwrap();

    let Some(DiagnosticsPanel::Document(panel)) = view.panel() else {
        panic!("expected document panel");
    };
    assert_eq!(panel.total_pages, 12);
    assert_eq!(panel.sample_pages[0].basic, "0.500");
    assert_eq!(panel.sample_pages[0].comprehensive, "0.123");
}

#[tokio::test]
async fn page_panel_truncates_large_groups() {
    let (view, pipeline) = build(FakeCorpus::new());

    pipeline.load_page("notes.pdf", 0).await.unwrap();

    let Some(DiagnosticsPanel::Page(panel)) = view.panel() else {
        panic!("expected page panel");
    };
    assert_eq!(panel.basic_score, "0.250");
    assert_eq!(panel.comprehensive_score, "0.750");

    let highlight = panel.groups.iter().find(|g| g.kind == "highlight").unwrap();
    assert_eq!(highlight.entries.len(), 5);
    assert_eq!(highlight.entries[0].confidence, "0.88");
    assert_eq!(highlight.overflow_note().as_deref(), Some("... and 2 more"));

    let underline = panel.groups.iter().find(|g| g.kind == "underline").unwrap();
    assert_eq!(underline.entries.len(), 3);
    assert_eq!(underline.entries[0].confidence, "0.50");
    assert!(underline.overflow_note().is_none());
}

#[tokio::test]
async fn failed_stage_leaves_previous_panel_untouched() {
    let (view, pipeline) = build(FakeCorpus::new());
    pipeline.load_corpus_stats().await.unwrap();
    let before = view.panel();

    let err = pipeline.load_document("broken.pdf").await.unwrap_err();

    assert!(err.is_malformed());
    assert_eq!(view.panel(), before);
    assert_eq!(view.panel_updates(), 1);
    let last = view.notice_history().pop().unwrap();
    assert_eq!(last.kind, NoticeKind::Error);
}

#[tokio::test]
async fn first_page_action_requests_page_zero() {
    let backend = FakeCorpus::new();
    let (view, pipeline) = build(backend.clone());

    pipeline
        .drill_down(&DrillDown::FirstPage {
            filename: "notes.pdf".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(
        *backend.page_requests.lock().unwrap(),
        vec![("notes.pdf".to_string(), 0)]
    );
    assert!(matches!(view.panel(), Some(DiagnosticsPanel::Page(_))));
}

#[tokio::test]
async fn probe_uses_first_document() {
    let backend = FakeCorpus::new();
    let (_view, pipeline) = build(backend.clone());

    let detail = pipeline.probe_annotations().await.unwrap();

    assert_eq!(detail.filename, "企業参謀.pdf");
    assert_eq!(
        *backend.page_requests.lock().unwrap(),
        vec![("企業参謀.pdf".to_string(), 0)]
    );
}

#[tokio::test]
async fn later_stages_replace_the_panel_wholesale() {
    let (view, pipeline) = build(FakeCorpus::new());

    pipeline.load_corpus_stats().await.unwrap();
    pipeline.show_document_list().await.unwrap();

    assert!(matches!(view.panel(), Some(DiagnosticsPanel::DocumentList(_))));
    assert_eq!(view.panel_updates(), 2);
}
