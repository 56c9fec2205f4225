//! CLI argument definitions using clap derive macros.

use clap::Parser;
use std::path::PathBuf;

/// Collect file URLs into tasks and serve them back as zip archives.
#[derive(Parser, Debug)]
#[command(name = "file-archiver")]
#[command(author, version, about)]
pub struct Args {
    /// Path to the JSON configuration file; defaults apply when it does not exist
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Override the configured listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the configured archive directory
    #[arg(short, long)]
    pub archive_dir: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
