//! Periodic removal of expired archive files
//!
//! The sweep works on the filesystem only. It does not consult the task store,
//! so an archive can be deleted before its client downloads it once it is
//! older than the configured age.

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Delete `*.zip` files in `archive_dir` last modified more than `max_age` ago
///
/// Only the top level of the directory is scanned. Failures on individual
/// files are logged and skipped. Returns the number of archives deleted.
pub async fn sweep_expired_archives(archive_dir: &Path, max_age: Duration) -> Result<usize> {
    use tokio::fs;

    let mut entries = fs::read_dir(archive_dir).await?;
    let now = SystemTime::now();
    let mut deleted = 0;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();

        if path.extension().and_then(|ext| ext.to_str()) != Some("zip") {
            continue;
        }

        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(?path, error = %e, "failed to read archive metadata");
                continue;
            }
        };

        if !metadata.is_file() {
            continue;
        }

        let modified = match metadata.modified() {
            Ok(modified) => modified,
            Err(e) => {
                warn!(?path, error = %e, "archive has no modification time");
                continue;
            }
        };

        // Future timestamps count as fresh
        let age = now.duration_since(modified).unwrap_or_default();
        if age <= max_age {
            continue;
        }

        info!(?path, age_secs = age.as_secs(), "deleting old archive");
        match fs::remove_file(&path).await {
            Ok(()) => deleted += 1,
            Err(e) => warn!(?path, error = %e, "failed to delete old archive"),
        }
    }

    debug!(?archive_dir, deleted, "archive sweep finished");
    Ok(deleted)
}

/// Sweep `archive_dir` every `interval` until the task is aborted
///
/// The first sweep runs one interval after start.
pub(crate) async fn run_cleanup_loop(archive_dir: PathBuf, interval: Duration, max_age: Duration) {
    info!(
        ?archive_dir,
        interval_secs = interval.as_secs(),
        max_age_secs = max_age.as_secs(),
        "archive cleanup started"
    );

    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(e) = sweep_expired_archives(&archive_dir, max_age).await {
            warn!(?archive_dir, error = %e, "archive sweep failed");
        }
    }
}
