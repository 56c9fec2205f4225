//! Error types for file-archiver
//!
//! This module provides the error handling for the library:
//! - The crate-wide [`Error`] returned by store operations and the API layer
//! - [`TaskError`] for task lookup and admission outcomes
//! - [`FileError`] for recoverable per-file failures inside a processing pass
//! - HTTP status code mapping and structured error bodies for the REST API

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for file-archiver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for file-archiver
///
/// Per-file failures never surface here; they are absorbed by the processing
/// pass and reported as aggregated text on the finished task.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "max_files_per_task")
        key: Option<String>,
    },

    /// Task lookup or admission error
    #[error(transparent)]
    Task(#[from] TaskError),

    /// Request body could not be interpreted
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Archive filename rejected before touching the filesystem
    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Task-related errors
#[derive(Debug, Error)]
pub enum TaskError {
    /// No task registered under this identifier
    #[error("task {id} not found")]
    NotFound {
        /// The identifier that was looked up
        id: String,
    },

    /// No archive file with this name exists on disk
    #[error("archive {filename} not found")]
    ArchiveNotFound {
        /// The requested archive filename
        filename: String,
    },

    /// Every admission slot is held by a running processing pass
    #[error("server is busy, please try again later ({capacity} tasks already processing)")]
    Busy {
        /// Configured maximum number of concurrent processing passes
        capacity: usize,
    },
}

/// A recoverable failure scoped to one submitted URL
///
/// The `Display` text is what ends up in a task's `error_details`.
#[derive(Debug, Error)]
pub enum FileError {
    /// The URL's extension is not on the allow-list
    #[error("file extension not allowed: {url}")]
    NotAllowed {
        /// The rejected URL
        url: String,
    },

    /// Transport-level failure while fetching
    #[error("failed to download file: {url}, error: {source}")]
    Fetch {
        /// The URL being fetched
        url: String,
        /// Underlying client error
        source: reqwest::Error,
    },

    /// Remote server answered with a non-success status
    #[error("failed to download file: {url}, status: {status}")]
    Status {
        /// The URL being fetched
        url: String,
        /// The response status
        status: reqwest::StatusCode,
    },

    /// The archive refused a new entry
    #[error("failed to create zip entry for {name}: {source}")]
    CreateEntry {
        /// Entry name derived from the URL
        name: String,
        /// Underlying zip error
        source: zip::result::ZipError,
    },

    /// Reading the body or writing it into the entry failed mid-stream
    #[error("failed to write to zip entry for {name}: {reason}")]
    Write {
        /// Entry name derived from the URL
        name: String,
        /// Description of the failed read or write
        reason: String,
    },
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "task_not_found",
///     "message": "task 0b8e... not found",
///     "details": {
///       "task_id": "0b8e..."
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "task_not_found", "busy")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,
            Error::InvalidRequest(_) => 400,
            Error::InvalidFilename(_) => 400,

            // 404 Not Found
            Error::Task(TaskError::NotFound { .. }) => 404,
            Error::Task(TaskError::ArchiveNotFound { .. }) => 404,

            // 503 Service Unavailable - admission denied
            Error::Task(TaskError::Busy { .. }) => 503,

            // 502 Bad Gateway - External service errors
            Error::Network(_) => 502,

            // 500 Internal Server Error - Server-side issues
            Error::Io(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Task(e) => match e {
                TaskError::NotFound { .. } => "task_not_found",
                TaskError::ArchiveNotFound { .. } => "archive_not_found",
                TaskError::Busy { .. } => "busy",
            },
            Error::InvalidRequest(_) => "invalid_request",
            Error::InvalidFilename(_) => "invalid_filename",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Task(TaskError::NotFound { id }) => Some(serde_json::json!({
                "task_id": id,
            })),
            Error::Task(TaskError::ArchiveNotFound { filename }) => Some(serde_json::json!({
                "filename": filename,
            })),
            Error::Task(TaskError::Busy { capacity }) => Some(serde_json::json!({
                "max_concurrent_tasks": capacity,
            })),
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({
                "key": key,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
