//! slicestore: list and reconstruct files stored as slices.

mod cli;
mod commands;
mod config;
mod digest;
mod source;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use slicestore_reassembly::ReassemblyError;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::source::Source;

/// Exit status after Ctrl-C (128 + SIGINT).
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting slicestore");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_cancelled(&e) => {
            eprintln!("cancelled");
            ExitCode::from(EXIT_CANCELLED)
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::List { source } => {
            let source = Source::open(&source, config.fetch_url.as_deref())?;
            let entries = commands::list(&source).await?;
            if entries.is_empty() {
                tracing::info!("no sliced files found");
            }
            for entry in entries {
                println!(
                    "{}\t{}/{}\t{}",
                    entry.summary.display_name,
                    entry.summary.received,
                    entry.summary.total,
                    entry.status
                );
            }
        }
        Command::Get {
            name,
            source,
            fetch_url,
            out,
            timeout,
            max_concurrent,
        } => {
            let fetch_url = fetch_url.or_else(|| config.fetch_url.clone());
            let source = Source::open(&source, fetch_url.as_deref())?;
            let out_dir = out
                .or_else(|| config.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            let options = config.fetch_options(timeout, max_concurrent);

            let written = commands::get(&source, &name, &out_dir, options).await?;
            println!(
                "{}\t{} bytes\tsha256:{}",
                written.path.display(),
                written.size,
                written.sha256
            );
        }
    }
    Ok(())
}

fn is_cancelled(e: &anyhow::Error) -> bool {
    e.downcast_ref::<ReassemblyError>()
        .is_some_and(ReassemblyError::is_cancelled)
}
