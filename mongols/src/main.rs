//! MongoDB collection listing tool.
//!
//! Connects to a server, selects a database and prints the names of its
//! collections on stdout. Diagnostics and logs go to stderr.
//!
//! # Guarantees
//! - Read-only commands only
//! - Credentials never appear in logs or error output
//! - Exit code 0 on success, 1 on any failure, with nothing on stdout

use clap::Parser;
use mongols::cli::Cli;
use mongols_core::{MongoLsError, init_logging};
use std::io::Write;
use std::process::ExitCode;
use tracing::debug;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet, cli.global.log_format) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let rendered = match mongols::run(&cli).await {
        Ok(rendered) => rendered,
        Err(e) => {
            debug!("Command failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = print_rendered(&rendered) {
        eprintln!("Error: {:#}", anyhow::Error::from(e));
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Writes the rendered result as one block; an empty rendering prints nothing.
fn print_rendered(rendered: &str) -> mongols_core::Result<()> {
    if rendered.is_empty() {
        return Ok(());
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", rendered)
        .and_then(|()| stdout.flush())
        .map_err(|e| MongoLsError::io("Failed to write listing to stdout", e))
}
