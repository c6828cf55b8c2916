//! Interactive REPL.
//!
//! Every submission and diagnostics command runs on its own tokio task so the
//! prompt stays usable while a request is outstanding. Outcomes come back on
//! a channel and are reported by a single handler task.

use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use kbchat_application::SubmitOutcome;
use kbchat_core::render::escape_text;
use kbchat_core::session::{ConversationTurn, Rejection};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;

use crate::app::App;

const COMMANDS: &[&str] = &[
    "/stats", "/docs", "/pdf", "/page", "/probe", "/history", "/clear", "/help",
];

const HELP: &str = "\
Commands:
  /stats                 corpus statistics
  /docs                  document list
  /pdf <file>            document detail
  /page <file> <index>   page detail (0 = first page)
  /probe                 annotation probe on the first document
  /history               committed conversation turns
  /clear                 clear the screen
  /help                  this help
  quit | exit            leave
Anything else is sent as a chat message.";

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Stats,
    Docs,
    Pdf(String),
    Page { filename: String, page_index: u32 },
    Probe,
    History,
    Clear,
    Help,
}

/// One line of REPL input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Empty,
    Quit,
    Message(String),
    Command(ReplCommand),
    /// A command with bad or missing arguments; carries the usage text.
    Invalid(String),
}

pub fn parse_line(line: &str) -> ReplInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplInput::Empty;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return ReplInput::Quit;
    }
    if !trimmed.starts_with('/') {
        return ReplInput::Message(trimmed.to_string());
    }

    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };

    let command = match name {
        "/stats" => ReplCommand::Stats,
        "/docs" => ReplCommand::Docs,
        "/probe" => ReplCommand::Probe,
        "/history" => ReplCommand::History,
        "/clear" => ReplCommand::Clear,
        "/help" => ReplCommand::Help,
        "/pdf" if !rest.is_empty() => ReplCommand::Pdf(rest.to_string()),
        "/pdf" => return ReplInput::Invalid("usage: /pdf <file>".to_string()),
        "/page" => {
            let parsed = rest
                .rsplit_once(char::is_whitespace)
                .and_then(|(file, index)| Some((file.trim(), index.parse::<u32>().ok()?)))
                .filter(|(file, _)| !file.is_empty());
            match parsed {
                Some((file, page_index)) => ReplCommand::Page {
                    filename: file.to_string(),
                    page_index,
                },
                None => return ReplInput::Invalid("usage: /page <file> <index>".to_string()),
            }
        }
        other => return ReplInput::Invalid(format!("unknown command {other}; try /help")),
    };
    ReplInput::Command(command)
}

fn report(outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Rejected(Rejection::AlreadyProcessing) => {
            println!("{}", "A reply is still pending; please wait.".yellow());
        }
        SubmitOutcome::TransportError { message } => {
            tracing::debug!(%message, "turn ended with transport error");
        }
        _ => {}
    }
}

fn print_history(app: &App) {
    let history = app.controller.history();
    if history.is_empty() {
        println!("{}", "No conversation yet.".bright_black());
        return;
    }
    for (index, turn) in history.iter().enumerate() {
        for line in history_lines(index, turn) {
            println!("{line}");
        }
    }
}

/// One committed turn, escaped for the terminal.
fn history_lines(index: usize, turn: &ConversationTurn) -> [String; 3] {
    [
        format!("#{} {}", index + 1, escape_text(&turn.timestamp))
            .bright_black()
            .to_string(),
        format!("  you: {}", escape_text(&turn.utterance)).green().to_string(),
        format!("  bot: {}", escape_text(&turn.response))
            .bright_blue()
            .to_string(),
    ]
}

fn spawn_command(app: &App, command: ReplCommand) {
    let pipeline = app.pipeline.clone();
    // Failures are already reported through the status notifier.
    match command {
        ReplCommand::Stats => {
            tokio::spawn(async move { pipeline.load_corpus_stats().await.map(|_| ()) });
        }
        ReplCommand::Docs => {
            tokio::spawn(async move { pipeline.show_document_list().await.map(|_| ()) });
        }
        ReplCommand::Pdf(filename) => {
            tokio::spawn(async move { pipeline.load_document(&filename).await.map(|_| ()) });
        }
        ReplCommand::Page {
            filename,
            page_index,
        } => {
            tokio::spawn(async move {
                pipeline
                    .load_page(&filename, page_index)
                    .await
                    .map(|_| ())
            });
        }
        ReplCommand::Probe => {
            tokio::spawn(async move { pipeline.probe_annotations().await.map(|_| ()) });
        }
        ReplCommand::History => print_history(app),
        ReplCommand::Clear => app.view.clear(),
        ReplCommand::Help => println!("{}", HELP.bright_black()),
    }
}

/// Runs the REPL until `quit`, `exit` or end of input.
pub async fn run(app: App) -> Result<()> {
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<SubmitOutcome>(32);

    let outcome_handler = tokio::spawn(async move {
        while let Some(outcome) = outcome_rx.recv().await {
            report(&outcome);
        }
    });

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== kbchat ===".bright_magenta().bold());
    println!(
        "{}",
        "Ask anything, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => match parse_line(&line) {
                ReplInput::Empty => continue,
                ReplInput::Quit => {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                ReplInput::Invalid(usage) => {
                    println!("{}", usage.yellow());
                }
                ReplInput::Command(command) => {
                    let _ = rl.add_history_entry(line.as_str());
                    spawn_command(&app, command);
                }
                ReplInput::Message(text) => {
                    let _ = rl.add_history_entry(line.as_str());
                    if app.view.input_locked() {
                        report(&SubmitOutcome::Rejected(Rejection::AlreadyProcessing));
                        continue;
                    }
                    let controller = app.controller.clone();
                    let tx = outcome_tx.clone();
                    tokio::spawn(async move {
                        let outcome = controller.submit(&text).await;
                        let _ = tx.send(outcome).await;
                    });
                }
            },
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    // In-flight chat turns cannot be cancelled; wait for their outcomes.
    // Diagnostics tasks are not awaited.
    drop(outcome_tx);
    let _ = outcome_handler.await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_message() {
        assert_eq!(
            parse_line("  こんにちは "),
            ReplInput::Message("こんにちは".to_string())
        );
        assert_eq!(parse_line("   "), ReplInput::Empty);
        assert_eq!(parse_line("exit"), ReplInput::Quit);
    }

    #[test]
    fn page_command_keeps_spaces_in_filename() {
        assert_eq!(
            parse_line("/page annual report.pdf 2"),
            ReplInput::Command(ReplCommand::Page {
                filename: "annual report.pdf".to_string(),
                page_index: 2,
            })
        );
    }

    #[test]
    fn bad_arguments_yield_usage() {
        assert!(matches!(parse_line("/page a.pdf"), ReplInput::Invalid(_)));
        assert!(matches!(parse_line("/page a.pdf x"), ReplInput::Invalid(_)));
        assert!(matches!(parse_line("/pdf"), ReplInput::Invalid(_)));
        assert!(matches!(parse_line("/nope"), ReplInput::Invalid(_)));
    }

    #[test]
    fn history_lines_escape_control_characters() {
        let turn = ConversationTurn::new("q\u{1b}[2J", "hi\u{1b}[2Jthere", "t");
        let lines = history_lines(0, &turn);
        assert!(lines.iter().all(|line| !line.contains("\u{1b}[2J")));
        assert!(lines[2].contains("hi\\u{1b}[2Jthere"));
    }

    #[test]
    fn simple_commands_parse() {
        assert_eq!(parse_line("/stats"), ReplInput::Command(ReplCommand::Stats));
        assert_eq!(
            parse_line("/pdf 企業参謀.pdf"),
            ReplInput::Command(ReplCommand::Pdf("企業参謀.pdf".to_string()))
        );
    }
}
