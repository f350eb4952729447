//! Headless pipeline runner.
//!
//! Usage:
//!     docket [FILE] [--config PATH] [-v]
//!
//! Watches the configured folder, classifies arriving PDFs and drains the
//! queue on an interval until the process is interrupted. An optional
//! positional file is queued immediately (file-association mode).

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use docket::{Pipeline, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "docket", version, about = "Watched-folder PDF filing pipeline")]
struct Args {
    /// Single PDF to queue on startup.
    file: Option<PathBuf>,

    /// Configuration file (default: the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose per-document logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // RUST_LOG wins; otherwise warn for most crates, info for the app.
    let default_filter = if args.verbose {
        "warn,docket=debug"
    } else {
        "warn,docket=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("failed to load configuration")?;

    fs::create_dir_all(&settings.watch_dir).with_context(|| {
        format!(
            "failed to create watch directory {}",
            settings.watch_dir.display()
        )
    })?;

    let pipeline = Arc::new(Pipeline::new(settings).context("failed to start pipeline")?);

    tracing::info!(
        watch_dir = %pipeline.settings().watch_dir.display(),
        "docket running"
    );

    if let Some(file) = &args.file {
        pipeline.enqueue_file(file);
    }
    pipeline
        .scan_watch_dir()
        .context("failed to scan watch directory")?;

    // Both services live for the rest of the process.
    let _watcher = pipeline
        .start_watcher()
        .context("failed to start folder watcher")?;
    let _drain = docket::services::DrainService::spawn(
        Arc::clone(&pipeline),
        pipeline.settings().drain_interval(),
    );

    loop {
        thread::park();
    }
}
