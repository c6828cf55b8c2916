//! `kbchat health`: probe the service health endpoint.

use std::process::ExitCode;

use colored::Colorize;

use crate::app::App;

pub async fn run(app: &App) -> ExitCode {
    match app.client.health().await {
        Ok(health) => {
            let mut line = format!("{} {}", health.status, health.message);
            if let Some(timestamp) = &health.timestamp {
                line.push_str(&format!(" ({timestamp})"));
            }
            println!("{}", line.trim_end().green());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", format!("unhealthy: {}", err.user_message()).red());
            ExitCode::FAILURE
        }
    }
}
