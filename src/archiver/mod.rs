//! Task store and processing orchestration
//!
//! [`FileArchiver`] owns every task for the lifetime of the process and
//! decides when a task starts processing. The pieces are split by concern:
//! - [`task`] - Task entity and its forward-only state machine
//! - [`processor`] - Download and archive assembly for one task
//! - [`cleanup`] - Periodic removal of expired archive files
//!
//! Lock order: the store lock is released before any task lock is taken, and
//! neither is held across network or disk I/O.

mod cleanup;
mod processor;
mod task;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use cleanup::sweep_expired_archives;
pub use processor::ARCHIVE_ROUTE_PREFIX;
pub use task::Task;

use crate::admission::AdmissionController;
use crate::config::Config;
use crate::error::{Error, Result, TaskError};
use crate::types::{FileAccepted, TaskId, TaskInfo};
use crate::utils::validate_archive_filename;
use processor::TaskProcessor;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// User agent sent with every file download
const USER_AGENT: &str = concat!("file-archiver/", env!("CARGO_PKG_VERSION"));

/// Main archiver instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct FileArchiver {
    /// Every task created since startup, never evicted
    pub(crate) tasks: Arc<Mutex<HashMap<TaskId, Arc<Task>>>>,
    /// Gate bounding concurrent processing passes
    pub(crate) admission: AdmissionController,
    /// Shared download and archive pipeline
    pub(crate) processor: TaskProcessor,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
}

impl FileArchiver {
    /// Create a new FileArchiver instance
    ///
    /// Validates the configuration, makes sure the archive directory exists,
    /// and builds the HTTP client shared by every processing pass.
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let archive_dir = config.archive.archive_dir.clone();
        tokio::fs::create_dir_all(&archive_dir).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create archive directory '{}': {}",
                    archive_dir.display(),
                    e
                ),
            ))
        })?;

        // No overall timeout: a slow remote holds its slot until it finishes
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        let processor = TaskProcessor::new(
            client,
            config.archive.allowed_extensions.clone(),
            archive_dir,
        );

        info!(
            max_files_per_task = config.archive.max_files_per_task,
            max_concurrent_tasks = config.archive.max_concurrent_tasks,
            allowed_extensions = ?config.archive.allowed_extensions,
            "file archiver initialized"
        );

        Ok(Self {
            tasks: Arc::new(Mutex::new(HashMap::new())),
            admission: AdmissionController::new(config.archive.max_concurrent_tasks),
            processor,
            config: Arc::new(config),
        })
    }

    /// Create an empty task in `Created` state
    ///
    /// Refused with [`TaskError::Busy`] while every processing slot is held,
    /// unless `reject_new_tasks_when_busy` is off. The check does not reserve
    /// anything, so it can be stale by the time files are added.
    pub async fn create_task(&self) -> Result<TaskInfo> {
        if self.config.archive.reject_new_tasks_when_busy && self.admission.is_saturated() {
            warn!(
                capacity = self.admission.capacity(),
                "rejecting new task, all processing slots in use"
            );
            return Err(TaskError::Busy {
                capacity: self.admission.capacity(),
            }
            .into());
        }

        let task = Arc::new(Task::new());
        let snapshot = task.snapshot().await;
        self.tasks.lock().await.insert(task.id(), task);

        info!(task_id = %snapshot.id, "task created");
        Ok(snapshot)
    }

    /// Append a file URL to a task and start processing once it is full
    ///
    /// The URL is recorded without validation; filtering happens during
    /// processing. When the append reaches the threshold but no slot is free,
    /// the file stays recorded, the task stays `Created`, and
    /// [`TaskError::Busy`] is returned. The next append retries admission.
    pub async fn add_file(&self, id: TaskId, url: String) -> Result<FileAccepted> {
        let task = self.lookup(id).await?;

        let appended = task
            .add_file(url, self.config.archive.max_files_per_task)
            .await;
        debug!(task_id = %id, file_count = appended.file_count, "file added");

        if !appended.ready {
            return Ok(FileAccepted {
                file_count: appended.file_count,
                processing_started: false,
            });
        }

        let Some(reservation) = self.admission.try_reserve() else {
            warn!(
                task_id = %id,
                capacity = self.admission.capacity(),
                "task ready but no processing slot available"
            );
            return Err(TaskError::Busy {
                capacity: self.admission.capacity(),
            }
            .into());
        };

        let Some(file_urls) = task.begin_processing().await else {
            // A concurrent append already claimed the pass
            reservation.release();
            return Ok(FileAccepted {
                file_count: appended.file_count,
                processing_started: false,
            });
        };

        info!(task_id = %id, files = file_urls.len(), "starting task processing");

        let processor = self.processor.clone();
        tokio::spawn(async move {
            // Held for the whole pass, released on every exit path
            let _reservation = reservation;
            processor.run(&task, file_urls).await;
        });

        Ok(FileAccepted {
            file_count: appended.file_count,
            processing_started: true,
        })
    }

    /// Snapshot of a task's observable fields
    pub async fn get_task(&self, id: TaskId) -> Result<TaskInfo> {
        let task = self.lookup(id).await?;
        Ok(task.snapshot().await)
    }

    /// Fetch the shared task handle, releasing the store lock before returning
    pub(crate) async fn lookup(&self, id: TaskId) -> Result<Arc<Task>> {
        self.tasks
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| {
                TaskError::NotFound {
                    id: id.to_string(),
                }
                .into()
            })
    }

    /// Resolve a requested archive filename to an existing file on disk
    ///
    /// The name is validated before any filesystem access.
    pub async fn archive_path(&self, filename: &str) -> Result<PathBuf> {
        validate_archive_filename(filename)?;

        let path = self.config.archive.archive_dir.join(filename);
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => Ok(path),
            _ => Err(TaskError::ArchiveNotFound {
                filename: filename.to_string(),
            }
            .into()),
        }
    }

    /// Admission gate shared by every processing pass
    pub fn admission(&self) -> &AdmissionController {
        &self.admission
    }

    /// Configuration the archiver was built with
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Number of tasks in the store
    pub async fn task_count(&self) -> usize {
        self.tasks.lock().await.len()
    }

    /// Start the periodic sweep of expired archives
    ///
    /// Returns a handle that completes immediately when cleanup is disabled.
    pub fn spawn_cleanup_sweeper(&self) -> JoinHandle<()> {
        let cleanup = self.config.cleanup.clone();
        if !cleanup.enabled {
            info!("archive cleanup disabled");
            return tokio::spawn(async {});
        }

        let archive_dir = self.config.archive.archive_dir.clone();
        tokio::spawn(cleanup::run_cleanup_loop(
            archive_dir,
            cleanup.interval,
            cleanup.max_age,
        ))
    }
}
