//! Archive download handler.

use crate::api::AppState;
use crate::error::Result;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use tokio_util::io::ReaderStream;

/// GET /archives/:filename - Download a finished archive
///
/// The file is streamed from disk rather than buffered.
#[utoipa::path(
    get,
    path = "/archives/{filename}",
    tag = "archives",
    params(
        ("filename" = String, Path, description = "Archive file name, e.g. `{task_id}.zip`")
    ),
    responses(
        (status = 200, description = "Zip archive", content_type = "application/zip"),
        (status = 400, description = "Filename contains a path separator or `..`", body = crate::error::ApiError),
        (status = 404, description = "Archive not found", body = crate::error::ApiError)
    )
)]
pub async fn download_archive(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response> {
    let path = state.archiver.archive_path(&filename).await?;
    let file = tokio::fs::File::open(&path).await?;

    tracing::debug!(filename = %filename, "serving archive");

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    let body = Body::from_stream(ReaderStream::new(file));
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/zip")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
