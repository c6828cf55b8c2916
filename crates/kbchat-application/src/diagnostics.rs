//! Diagnostics pipeline: fetch a snapshot, build its panel, replace the view.
//!
//! Stages are independent and may overlap. A failed stage reports through the
//! notifier and leaves the current panel as it was.

use std::future::Future;
use std::sync::Arc;

use kbchat_core::diagnostics::{
    CorpusPanel, DiagnosticsPanel, DocumentListPanel, DocumentPanel, DrillDown, PagePanel,
    PanelOptions,
};
use kbchat_core::render::DiagnosticsView;
use kbchat_core::{DiagnosticsBackend, KbchatError, Result, StatusNotifier};
use kbchat_types::{CorpusStats, DocumentDetail, PageDetail};

pub struct DiagnosticsPipeline {
    backend: Arc<dyn DiagnosticsBackend>,
    view: Arc<dyn DiagnosticsView>,
    notifier: StatusNotifier,
    options: PanelOptions,
}

impl DiagnosticsPipeline {
    pub fn new(
        backend: Arc<dyn DiagnosticsBackend>,
        view: Arc<dyn DiagnosticsView>,
        notifier: StatusNotifier,
        options: PanelOptions,
    ) -> Self {
        Self {
            backend,
            view,
            notifier,
            options,
        }
    }

    /// Corpus totals, annotation-type breakdown and the document list.
    pub async fn load_corpus_stats(&self) -> Result<CorpusStats> {
        self.run_stage(
            "corpus statistics",
            self.backend.corpus_stats(),
            |stats| DiagnosticsPanel::Corpus(CorpusPanel::from_stats(stats)),
        )
        .await
    }

    /// Documents with their drill-down actions.
    pub async fn show_document_list(&self) -> Result<CorpusStats> {
        self.run_stage(
            "document list",
            self.backend.corpus_stats(),
            |stats| DiagnosticsPanel::DocumentList(DocumentListPanel::from_stats(stats)),
        )
        .await
    }

    pub async fn load_document(&self, filename: &str) -> Result<DocumentDetail> {
        self.run_stage(
            &format!("details of {filename}"),
            self.backend.document_detail(filename),
            |detail| DiagnosticsPanel::Document(DocumentPanel::from_detail(detail)),
        )
        .await
    }

    /// `page_index` is zero-based.
    pub async fn load_page(&self, filename: &str, page_index: u32) -> Result<PageDetail> {
        let options = self.options;
        self.run_stage(
            &format!("page {} of {filename}", u64::from(page_index) + 1),
            self.backend.page_detail(filename, page_index),
            |detail| DiagnosticsPanel::Page(PagePanel::from_detail(detail, &options)),
        )
        .await
    }

    /// Runs a drill-down action offered by a corpus or document list panel.
    pub async fn drill_down(&self, action: &DrillDown) -> Result<()> {
        match action {
            DrillDown::Detail { filename } => self.load_document(filename).await.map(|_| ()),
            DrillDown::FirstPage { filename } => self.load_page(filename, 0).await.map(|_| ()),
        }
    }

    /// Runs the page stage on the first page of the first document.
    pub async fn probe_annotations(&self) -> Result<PageDetail> {
        self.notifier.info("Running annotation probe...");
        let stats = match self.backend.corpus_stats().await {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(error = %err, "annotation probe failed");
                self.notifier
                    .error(format!("Annotation probe failed: {}", err.user_message()));
                return Err(err);
            }
        };

        let Some(filename) = stats.pdf_files.first() else {
            tracing::warn!("annotation probe found no documents");
            let err = KbchatError::application("no documents available for testing");
            self.notifier.error(err.user_message());
            return Err(err);
        };

        self.load_page(filename, 0).await
    }

    async fn run_stage<T, Fut, F>(&self, label: &str, fetch: Fut, build: F) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
        F: FnOnce(&T) -> DiagnosticsPanel,
    {
        self.notifier.info(format!("Loading {label}..."));
        match fetch.await {
            Ok(snapshot) => {
                self.view.replace_panel(build(&snapshot));
                self.notifier.success(format!("Loaded {label}"));
                Ok(snapshot)
            }
            Err(err) => {
                tracing::warn!(stage = label, error = %err, "diagnostics fetch failed");
                self.notifier
                    .error(format!("Failed to load {label}: {}", err.user_message()));
                Err(err)
            }
        }
    }
}
