//! # file-archiver
//!
//! HTTP service that collects file URLs into tasks and bundles the downloaded
//! files into one zip archive per task.
//!
//! ## How it works
//!
//! - A client creates a task and adds file URLs to it one at a time
//! - Once a task holds `max_files_per_task` URLs it is processed in the background:
//!   each allowed file is downloaded in order and streamed into `{task_id}.zip`
//! - At most `max_concurrent_tasks` tasks are processed at once; requests that
//!   would exceed that are refused with `503` instead of queueing
//! - Per-file failures never fail the task; they are collected into its
//!   `error_details` and the archive keeps the files that succeeded
//!
//! ## Quick Start
//!
//! ```no_run
//! use file_archiver::{Config, FileArchiver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let archiver = FileArchiver::new(Config::default()).await?;
//!
//!     let task = archiver.create_task().await?;
//!     archiver.add_file(task.id, "https://example.com/report.pdf".into()).await?;
//!
//!     println!("{:?}", archiver.get_task(task.id).await?.status);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Bounded admission for processing passes
pub mod admission;
/// REST API module
pub mod api;
/// Task store, processing, and archive cleanup
pub mod archiver;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use admission::{AdmissionController, Reservation};
pub use archiver::FileArchiver;
pub use config::Config;
pub use error::{ApiError, Error, ErrorDetail, FileError, Result, TaskError, ToHttpStatus};
pub use types::{AddFileRequest, FileAccepted, Status, TaskId, TaskInfo};

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Helper function to run the archiver's HTTP service with graceful signal handling.
///
/// Starts the archive cleanup sweep and the API server, then waits for a
/// termination signal. On signal the server stops accepting connections and
/// gets the configured grace period to finish in-flight requests. Background
/// processing passes are not awaited.
///
/// Listens for Ctrl+C everywhere and for SIGTERM on unix.
///
/// # Example
///
/// ```no_run
/// use file_archiver::{Config, FileArchiver, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let archiver = FileArchiver::new(Config::default()).await?;
///
///     // Run with automatic signal handling
///     run_with_shutdown(archiver).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(archiver: FileArchiver) -> Result<()> {
    let archiver = Arc::new(archiver);
    let config = archiver.config().clone();

    let cleanup = archiver.spawn_cleanup_sweeper();

    let shutdown = CancellationToken::new();
    let signal_task = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            wait_for_signal().await;
            shutdown.cancel();
        }
    });

    let result = api::start_api_server(archiver, config, shutdown).await;

    signal_task.abort();
    cleanup.abort();
    tracing::info!("Shutdown complete");
    result
}

/// Resolves on Ctrl+C; stays pending if the handler cannot be installed
async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
                _ = ctrl_c() => {}
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for Ctrl+C only");
            ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    ctrl_c().await;
}
