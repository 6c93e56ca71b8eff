mod cli;
mod config;
mod insights;
mod models;
mod run;
mod storage;
mod ui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose);

    let config = config::Config::resolve(cli.data_dir.as_deref())?;
    tracing::debug!(data_dir = %config.data_dir.display(), "resolved data directory");
    let storage = storage::Storage::new(&config.data_dir);

    run::as_cli(cli, &storage)
}

/// RUST_LOG wins, then --verbose, then warnings only. Logs go to stderr so
/// tables and JSON on stdout stay clean.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
