//! Library side of the mongols binary.
//!
//! Split out of `main.rs` so the command flow can be tested against an
//! in-memory catalog as well as a real server.

pub mod cli;
pub mod output;

use anyhow::Context;
use cli::{Cli, Command};
use mongols_core::{CatalogSource, ListOptions, MongoSession, list_collections, list_databases};
use output::{OutputFormat, render};
use tracing::{debug, info};

/// Connects, runs the selected command and closes the connection.
///
/// The session is closed whether or not the command succeeded; the
/// command's error is returned afterwards. The returned string is what
/// belongs on stdout.
///
/// # Errors
/// Returns error if the configuration is invalid, the server cannot be
/// reached, or the command fails
pub async fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = cli.connection.to_config();
    info!("Target: {}", config);

    let session = MongoSession::connect(&config)
        .await
        .context("Could not set up the MongoDB client")?;

    let database = session.database_name().to_string();
    let result = execute(
        &session,
        &database,
        &cli.command_or_default(),
        cli.global.format,
    )
    .await;

    session.close().await;
    debug!("Connection closed");

    result
}

/// Runs one command against a catalog and renders its result.
///
/// # Errors
/// Returns the catalog's error with context describing the command
pub async fn execute<S>(
    source: &S,
    database: &str,
    command: &Command,
    format: OutputFormat,
) -> anyhow::Result<String>
where
    S: CatalogSource + ?Sized,
{
    match command {
        Command::Collections(args) => {
            let mut options = ListOptions::default()
                .with_include_system(!args.exclude_system)
                .with_sort(args.sort);
            if let Some(filter) = &args.filter {
                options = options.with_name_filter(filter.clone());
            }

            let listing = list_collections(source, database, &options)
                .await
                .with_context(|| format!("Could not list collections of '{}'", database))?;
            Ok(render(&listing.names, format)?)
        }
        Command::Databases(args) => {
            let databases = list_databases(source, args.include_system)
                .await
                .context("Could not list databases")?;
            Ok(render(&databases, format)?)
        }
        Command::Ping => {
            source
                .ping(database)
                .await
                .with_context(|| format!("Ping against '{}' failed", database))?;
            Ok(format!("ok: server reachable, database '{}' selected", database))
        }
    }
}
