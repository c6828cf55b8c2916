//! Wiring: configuration, HTTP client, views, controller and pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use kbchat_application::{ChatController, DiagnosticsPipeline};
use kbchat_core::StatusNotifier;
use kbchat_interaction::{AppConfig, HttpServiceClient, load_effective_config};

use crate::terminal::TerminalView;

/// Flags that override the configuration file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub base_url: Option<String>,
    pub threshold: Option<f64>,
    pub no_context: bool,
}

/// Loads the effective configuration and applies command-line flags on top.
pub fn resolve_config(overrides: &Overrides) -> Result<AppConfig> {
    let mut config = load_effective_config(overrides.config.as_deref())?;
    if let Some(base_url) = &overrides.base_url {
        config.endpoint.base_url = base_url.clone();
    }
    if let Some(threshold) = overrides.threshold {
        config.chat.confidence_threshold = threshold;
    }
    if overrides.no_context {
        config.chat.send_context = false;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub struct App {
    pub view: Arc<TerminalView>,
    pub client: Arc<HttpServiceClient>,
    pub controller: Arc<ChatController>,
    pub pipeline: Arc<DiagnosticsPipeline>,
}

impl App {
    pub fn bootstrap(config: AppConfig) -> Result<Self> {
        let client = Arc::new(HttpServiceClient::new(&config.endpoint)?);
        let view = Arc::new(TerminalView::new());
        let notifier = StatusNotifier::with_ttl(view.clone(), config.chat.notice_ttl());

        let pipeline = Arc::new(DiagnosticsPipeline::new(
            client.clone(),
            view.clone(),
            notifier.clone(),
            config.chat.panel_options(),
        ));
        let controller = Arc::new(ChatController::new(
            client.clone(),
            view.clone(),
            notifier,
            config.chat,
        ));

        tracing::info!(
            base_url = %client.base_url(),
            threshold = controller.config().confidence_threshold,
            send_context = controller.config().send_context,
            "kbchat ready"
        );

        Ok(Self {
            view,
            client,
            controller,
            pipeline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_win_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[endpoint]\nbase_url = \"http://file:1\"\n\n[chat]\nconfidence_threshold = 0.5\n"
        )
        .unwrap();

        let config = resolve_config(&Overrides {
            config: Some(file.path().to_path_buf()),
            base_url: Some("http://flag:2".to_string()),
            threshold: Some(0.7),
            no_context: true,
        })
        .unwrap();

        assert_eq!(config.endpoint.base_url, "http://flag:2");
        assert_eq!(config.chat.confidence_threshold, 0.7);
        assert!(!config.chat.send_context);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_config(&Overrides {
            config: Some(dir.path().join("missing.toml")),
            threshold: Some(1.5),
            ..Overrides::default()
        });
        assert!(result.is_err());
    }
}
