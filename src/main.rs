//! CLI entry point for the file archiver service.

use clap::Parser;
use file_archiver::{Config, FileArchiver, run_with_shutdown};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let mut config = if args.config.exists() {
        info!(path = %args.config.display(), "Loading configuration");
        Config::load(&args.config)?
    } else {
        warn!(
            path = %args.config.display(),
            "Configuration file not found, using defaults"
        );
        Config::default()
    };

    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(archive_dir) = args.archive_dir {
        config.archive.archive_dir = archive_dir;
    }

    let archiver = FileArchiver::new(config).await?;
    run_with_shutdown(archiver).await?;

    Ok(())
}
