//! Test configuration builders

use file_archiver::{Config, FileArchiver};
use std::sync::Arc;
use tempfile::TempDir;

/// Config writing archives into `temp_dir` with cleanup disabled
pub fn test_config(temp_dir: &TempDir, max_files_per_task: usize) -> Config {
    let mut config = Config::default();
    config.archive.archive_dir = temp_dir.path().join("archives");
    config.archive.max_files_per_task = max_files_per_task;
    config.cleanup.enabled = false;
    config
}

/// Build an archiver plus the router serving it
pub async fn create_test_service(
    max_files_per_task: usize,
) -> (axum::Router, Arc<FileArchiver>, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = test_config(&temp_dir, max_files_per_task);

    let archiver = Arc::new(
        FileArchiver::new(config)
            .await
            .expect("Failed to create archiver"),
    );
    let router = file_archiver::api::create_router(archiver.clone(), archiver.config().clone());
    (router, archiver, temp_dir)
}
