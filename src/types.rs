//! Core types for file-archiver

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Name of the archive file produced for this task
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.0)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Task status
///
/// Moves forward only: `Created -> Processing -> Done | Error`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Accepting file URLs
    Created,
    /// Archive is being assembled
    Processing,
    /// Archive finished; `error_details` may still list files that failed
    Done,
    /// Archive container could not be created
    Error,
}

impl Status {
    /// Whether no further transitions can happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Done | Status::Error)
    }
}

/// Read-only snapshot of a task's observable fields
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskInfo {
    /// Task identifier
    pub id: TaskId,

    /// Current status
    pub status: Status,

    /// Submitted file URLs in submission order
    pub file_urls: Vec<String>,

    /// Public locator of the produced archive, once available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,

    /// Aggregated per-file errors, or the fatal archive error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Request body for POST /tasks/{id}/files
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AddFileRequest {
    /// URL of the file to include in the archive
    pub url: String,
}

/// Outcome of appending a file to a task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileAccepted {
    /// Number of files recorded on the task after this append
    pub file_count: usize,

    /// Whether this append launched the processing pass
    pub processing_started: bool,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_round_trips_through_display_and_from_str() {
        let id = TaskId::new();
        let parsed: TaskId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<TaskId>().is_err());
    }

    #[test]
    fn archive_file_name_uses_task_id() {
        let id = TaskId::new();
        assert_eq!(id.archive_file_name(), format!("{}.zip", id));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Created).unwrap(), "\"created\"");
        assert_eq!(
            serde_json::to_string(&Status::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(serde_json::to_string(&Status::Done).unwrap(), "\"done\"");
        assert_eq!(serde_json::to_string(&Status::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn status_order_follows_lifecycle() {
        assert!(Status::Created < Status::Processing);
        assert!(Status::Processing < Status::Done);
        assert!(Status::Processing < Status::Error);
        assert!(Status::Done.is_terminal());
        assert!(Status::Error.is_terminal());
        assert!(!Status::Processing.is_terminal());
    }

    #[test]
    fn task_info_omits_absent_optional_fields() {
        let info = TaskInfo {
            id: TaskId::new(),
            status: Status::Created,
            file_urls: vec![],
            result_url: None,
            error_details: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("result_url").is_none());
        assert!(json.get("error_details").is_none());
        assert_eq!(json["status"], "created");
    }
}
