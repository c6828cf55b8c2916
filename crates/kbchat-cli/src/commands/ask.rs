//! `kbchat ask`: a single non-interactive turn.

use std::process::ExitCode;

use kbchat_application::SubmitOutcome;

use crate::app::App;

pub async fn run(app: &App, text: &str) -> ExitCode {
    match app.controller.submit(text).await {
        SubmitOutcome::Answered { .. } => ExitCode::SUCCESS,
        SubmitOutcome::Rejected(rejection) => {
            eprintln!("Nothing sent: {rejection}");
            ExitCode::FAILURE
        }
        SubmitOutcome::ServiceError { .. } | SubmitOutcome::TransportError { .. } => {
            ExitCode::FAILURE
        }
    }
}
