//! Task entity: one archive job and its forward-only state machine.

use crate::types::{Status, TaskId, TaskInfo};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// Mutable fields of a task, only reachable through the task's lock
#[derive(Debug)]
struct TaskState {
    status: Status,
    file_urls: Vec<String>,
    result_url: Option<String>,
    error_details: Option<String>,
}

/// A single archive job
///
/// The task exclusively owns its mutable fields; every read and write goes
/// through one per-instance lock so a client append can never interleave with
/// processor updates. The lock is never held across network or disk I/O.
#[derive(Debug)]
pub struct Task {
    id: TaskId,
    created_at: DateTime<Utc>,
    state: Mutex<TaskState>,
}

/// Result of recording a file URL on a task
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Appended {
    /// File count after the append
    pub(crate) file_count: usize,
    /// Task is still `Created` and has reached the processing threshold
    pub(crate) ready: bool,
}

impl Task {
    /// Create a task with a fresh identifier, status `Created` and no files
    pub fn new() -> Self {
        Self {
            id: TaskId::new(),
            created_at: Utc::now(),
            state: Mutex::new(TaskState {
                status: Status::Created,
                file_urls: Vec::new(),
                result_url: None,
                error_details: None,
            }),
        }
    }

    /// Task identifier
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Append a URL without validating it
    ///
    /// Appends are always recorded. `ready` is only reported while the task is
    /// still `Created`, so appends after processing has started never trigger
    /// another pass.
    pub(crate) async fn add_file(&self, url: String, threshold: usize) -> Appended {
        let mut state = self.state.lock().await;
        state.file_urls.push(url);
        let file_count = state.file_urls.len();
        Appended {
            file_count,
            ready: state.status == Status::Created && file_count >= threshold,
        }
    }

    /// Claim the `Created -> Processing` transition
    ///
    /// Returns the file list frozen for this pass, or `None` when the task has
    /// already left `Created` (another caller won the claim).
    pub(crate) async fn begin_processing(&self) -> Option<Vec<String>> {
        let mut state = self.state.lock().await;
        if state.status != Status::Created {
            return None;
        }
        state.status = Status::Processing;
        Some(state.file_urls.clone())
    }

    /// Record a fatal failure: the archive container could not be created
    pub(crate) async fn mark_error(&self, detail: String) {
        let mut state = self.state.lock().await;
        if state.status != Status::Processing {
            tracing::warn!(
                task_id = %self.id,
                status = ?state.status,
                "ignoring error transition outside of processing"
            );
            return;
        }
        state.status = Status::Error;
        state.error_details = Some(detail);
    }

    /// Finish a pass whose archive container was created
    ///
    /// The task ends in `Done` even when every file failed; per-file messages
    /// are joined with `"; "` into `error_details`.
    pub(crate) async fn finish(&self, result_url: String, errors: Vec<String>) {
        let mut state = self.state.lock().await;
        if state.status != Status::Processing {
            tracing::warn!(
                task_id = %self.id,
                status = ?state.status,
                "ignoring done transition outside of processing"
            );
            return;
        }
        if !errors.is_empty() {
            state.error_details = Some(errors.join("; "));
        }
        state.result_url = Some(result_url);
        state.status = Status::Done;
    }

    /// Current status
    pub async fn status(&self) -> Status {
        self.state.lock().await.status
    }

    /// Consistent copy of every observable field
    pub async fn snapshot(&self) -> TaskInfo {
        let state = self.state.lock().await;
        TaskInfo {
            id: self.id,
            status: state.status,
            file_urls: state.file_urls.clone(),
            result_url: state.result_url.clone(),
            error_details: state.error_details.clone(),
            created_at: self.created_at,
        }
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::new()
    }
}
