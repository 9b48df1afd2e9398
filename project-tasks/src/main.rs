//! project-tasks CLI
//!
//! Usage:
//!   project-tasks list --org acme --project-id 5 --status "In Progress"
//!   project-tasks children --project-id 5 --task-number 10 --output tree
//!   project-tasks show --project-id 5 --task-number 10
//!
//! Logs go to stderr, rendered output to stdout.

mod cli;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use project_tasks::logging::{init_tracing, level_for};
use project_tasks::ProjectError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&["project_tasks"], level_for(cli.verbose, cli.quiet)) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    match cli::run(cli).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            exit_code(&err)
        }
    }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<ProjectError>() {
        Some(ProjectError::Usage(_)) => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}
