//! Diagnostics one-shots: `stats`, `docs`, `pdf`, `page`, `probe`.

use std::process::ExitCode;

use kbchat_core::Result;

use crate::app::App;

#[derive(Debug, Clone)]
pub enum Stage {
    Stats,
    Docs,
    Pdf { filename: String },
    Page { filename: String, page_index: u32 },
    Probe,
}

pub async fn run(app: &App, stage: Stage) -> ExitCode {
    let pipeline = &app.pipeline;
    let result: Result<()> = match &stage {
        Stage::Stats => pipeline.load_corpus_stats().await.map(|_| ()),
        Stage::Docs => pipeline.show_document_list().await.map(|_| ()),
        Stage::Pdf { filename } => pipeline.load_document(filename).await.map(|_| ()),
        Stage::Page {
            filename,
            page_index,
        } => pipeline.load_page(filename, *page_index).await.map(|_| ()),
        Stage::Probe => pipeline.probe_annotations().await.map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(?stage, error = %err, "diagnostics command failed");
            ExitCode::FAILURE
        }
    }
}
