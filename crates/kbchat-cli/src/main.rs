use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod commands;
mod logging;
mod repl;
mod terminal;

use app::{App, Overrides};
use commands::diagnostics::Stage;

#[derive(Parser)]
#[command(name = "kbchat")]
#[command(about = "kbchat - bilingual knowledge-base chat client", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.config/kbchat/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Service base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Confidence below which answers carry a caveat
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Do not send recent turns as context
    #[arg(long, global = true)]
    no_context: bool,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Ask a single question and exit
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Corpus statistics
    Stats,
    /// Document list
    Docs,
    /// Detail of one document
    Pdf { filename: String },
    /// Annotations of one page (index 0 is the first page)
    Page { filename: String, page_index: u32 },
    /// Annotation probe on the first document
    Probe,
    /// Service health
    Health,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose)?;

    let config = app::resolve_config(&Overrides {
        config: cli.config,
        base_url: cli.base_url,
        threshold: cli.threshold,
        no_context: cli.no_context,
    })?;
    let app = App::bootstrap(config)?;

    let code = match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            repl::run(app).await?;
            ExitCode::SUCCESS
        }
        Commands::Ask { text } => commands::ask::run(&app, &text.join(" ")).await,
        Commands::Stats => commands::diagnostics::run(&app, Stage::Stats).await,
        Commands::Docs => commands::diagnostics::run(&app, Stage::Docs).await,
        Commands::Pdf { filename } => {
            commands::diagnostics::run(&app, Stage::Pdf { filename }).await
        }
        Commands::Page {
            filename,
            page_index,
        } => {
            commands::diagnostics::run(
                &app,
                Stage::Page {
                    filename,
                    page_index,
                },
            )
            .await
        }
        Commands::Probe => commands::diagnostics::run(&app, Stage::Probe).await,
        Commands::Health => commands::health::run(&app).await,
    };

    Ok(code)
}
