//! Shared test helpers for creating FileArchiver instances in tests.

use crate::archiver::FileArchiver;
use crate::config::Config;
use crate::types::{Status, TaskId, TaskInfo};
use std::time::Duration;
use tempfile::tempdir;

/// Config pointing at `dir` with cleanup off and an allow-list for `.pdf` and `.jpg`
pub(crate) fn test_config(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.archive.archive_dir = dir.join("archives");
    config.archive.allowed_extensions = vec![".pdf".to_string(), ".jpg".to_string()];
    config.archive.max_files_per_task = 3;
    config.archive.max_concurrent_tasks = 3;
    config.cleanup.enabled = false;
    config
}

/// Helper to create a test FileArchiver with its archive dir inside a tempdir.
/// Returns the archiver and the tempdir (which must be kept alive).
pub(crate) async fn create_test_archiver() -> (FileArchiver, tempfile::TempDir) {
    create_test_archiver_with(|_| {}).await
}

/// Same as [`create_test_archiver`] but lets the caller adjust the config first
pub(crate) async fn create_test_archiver_with(
    tweak: impl FnOnce(&mut Config),
) -> (FileArchiver, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let mut config = test_config(temp_dir.path());
    tweak(&mut config);

    let archiver = FileArchiver::new(config).await.unwrap();
    (archiver, temp_dir)
}

/// Poll a task until it reaches `Done` or `Error`, panicking after 10 seconds
pub(crate) async fn wait_for_terminal(archiver: &FileArchiver, id: TaskId) -> TaskInfo {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        let info = archiver.get_task(id).await.unwrap();
        if info.status.is_terminal() {
            return info;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "task {id} stuck in {:?}",
            info.status
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Poll until the task has left `Created`
pub(crate) async fn wait_for_status_past_created(archiver: &FileArchiver, id: TaskId) -> Status {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        let status = archiver.get_task(id).await.unwrap().status;
        if status != Status::Created {
            return status;
        }
        assert!(tokio::time::Instant::now() < deadline, "task {id} never started");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Entry names of a finished archive, in archive order
pub(crate) fn archive_entry_names(path: &std::path::Path) -> Vec<String> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Poll until every admission slot has been returned
///
/// A task turns terminal slightly before its pass drops the reservation.
pub(crate) async fn wait_for_idle(archiver: &FileArchiver) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while archiver.admission().in_use() > 0 {
        assert!(tokio::time::Instant::now() < deadline, "slots never released");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
