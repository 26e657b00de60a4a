// ABOUTME: Main entry point for gatewise, the gateway onboarding wizard CLI
//
// Binary: gatewise
// Usage: gatewise [--format text|json] <COMMAND>
// - steps / show / template: inspect the wizard
// - set: store a step record
// - next / prev / goto: move through the wizard
// - review / deploy: finish the configuration
// - login / logout / reset: session handling
// - dashboard: demo traffic analytics

#![allow(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use gatewise::config::AppConfig;
use gatewise::store::FileStore;

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let config = AppConfig::load()?;

    if let Err(e) = setup_logging(&config) {
        eprintln!("Warning: file logging disabled: {e:#}");
    }
    setup_panic_handler();

    let store_path = config.store_path()?;
    let store = FileStore::open(&store_path)
        .with_context(|| format!("Failed to open store at {}", store_path.display()))?
        .with_quota(config.store.quota_bytes);
    tracing::debug!("Using store at {}", store_path.display());

    let ctx = cli::CliContext::new(config, Arc::new(store));
    cli::execute(&ctx, args.command, args.format).await
}

fn setup_logging(config: &AppConfig) -> Result<()> {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = config.log_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;

    // One JSONL file per invocation
    let log_file = log_dir.join(format!(
        "gatewise-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;

    let fallback = config.logging.filter.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .init();

    Ok(())
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
