//! Task handlers: create, add file, status.

use crate::api::AppState;
use crate::error::{Error, Result, TaskError};
use crate::types::{AddFileRequest, FileAccepted, TaskId, TaskInfo};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};

/// Parse a path segment as a task id
///
/// A malformed id cannot name any task, so it is reported as not found.
fn parse_task_id(raw: &str) -> Result<TaskId> {
    raw.parse().map_err(|_| {
        Error::Task(TaskError::NotFound {
            id: raw.to_string(),
        })
    })
}

/// POST /tasks - Create a new task
#[utoipa::path(
    post,
    path = "/tasks",
    tag = "tasks",
    responses(
        (status = 201, description = "Task created", body = TaskInfo),
        (status = 503, description = "All processing slots are in use", body = crate::error::ApiError)
    )
)]
pub async fn create_task(State(state): State<AppState>) -> Result<(StatusCode, Json<TaskInfo>)> {
    let info = state.archiver.create_task().await?;
    Ok((StatusCode::CREATED, Json(info)))
}

/// POST /tasks/:id/files - Add a file URL to a task
#[utoipa::path(
    post,
    path = "/tasks/{id}/files",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    request_body = AddFileRequest,
    responses(
        (status = 202, description = "File recorded", body = FileAccepted),
        (status = 400, description = "Malformed body or empty URL", body = crate::error::ApiError),
        (status = 404, description = "Task not found", body = crate::error::ApiError),
        (status = 503, description = "Task is full but no processing slot is free; the file was still recorded", body = crate::error::ApiError)
    )
)]
pub async fn add_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<AddFileRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FileAccepted>)> {
    let id = parse_task_id(&id)?;

    // Unknown task wins over a bad body
    state.archiver.lookup(id).await?;

    let Json(request) = body.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    if request.url.trim().is_empty() {
        return Err(Error::InvalidRequest("url must not be empty".to_string()));
    }

    // Stored exactly as submitted
    let accepted = state.archiver.add_file(id, request.url).await?;
    Ok((StatusCode::ACCEPTED, Json(accepted)))
}

/// GET /tasks/:id - Get task status
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = String, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task status", body = TaskInfo),
        (status = 404, description = "Task not found", body = crate::error::ApiError)
    )
)]
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskInfo>> {
    let id = parse_task_id(&id)?;
    let info = state.archiver.get_task(id).await?;
    Ok(Json(info))
}
