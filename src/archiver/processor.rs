//! Task processor: downloads a task's files and assembles its zip archive.
//!
//! One pass per task:
//! 1. The caller moves the task to `Processing` and hands over the frozen file list
//! 2. The archive container `{task_id}.zip` is created (failure is fatal)
//! 3. Each URL is filtered, fetched, and streamed into an entry, strictly in order
//! 4. Per-file failures are aggregated and the task is marked `Done`
//!
//! The zip writer owns the file handle and is finalized on every path out of
//! steps 2 to 4. If it is dropped early the writer still closes the archive.

use super::task::Task;
use crate::error::FileError;
use crate::utils::{entry_name_from_url, is_allowed_extension};
use futures::StreamExt;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use zip::ZipWriter;
use zip::write::FileOptions;

/// Public route archives are served under
pub const ARCHIVE_ROUTE_PREFIX: &str = "/archives";

/// Drives tasks through download and archive assembly
///
/// Cheap to clone; every pass shares the same HTTP client.
#[derive(Clone, Debug)]
pub struct TaskProcessor {
    client: reqwest::Client,
    allowed_extensions: Arc<Vec<String>>,
    archive_dir: PathBuf,
}

impl TaskProcessor {
    /// Create a processor writing archives into `archive_dir`
    pub fn new(
        client: reqwest::Client,
        allowed_extensions: Vec<String>,
        archive_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            allowed_extensions: Arc::new(allowed_extensions),
            archive_dir: archive_dir.into(),
        }
    }

    /// Run the pipeline for a task already moved to `Processing`
    ///
    /// Never returns an error: a fatal container failure moves the task to
    /// `Error`, everything else ends in `Done` with aggregated details.
    pub async fn run(&self, task: &Task, file_urls: Vec<String>) {
        let task_id = task.id();
        let file_name = task_id.archive_file_name();
        let archive_path = self.archive_dir.join(&file_name);

        info!(
            task_id = %task_id,
            files = file_urls.len(),
            path = ?archive_path,
            "processing task"
        );

        let file = match File::create(&archive_path) {
            Ok(file) => file,
            Err(e) => {
                error!(task_id = %task_id, error = %e, "failed to create zip file");
                let detail = format!("failed to create zip file: {}", e);
                task.mark_error(detail).await;
                return;
            }
        };

        let mut archive = ZipWriter::new(file);
        let mut errors = Vec::new();

        for url in &file_urls {
            debug!(task_id = %task_id, url = %url, "processing file");
            match self.append_file(&mut archive, url).await {
                Ok((name, bytes)) => {
                    debug!(task_id = %task_id, entry = %name, bytes, "added archive entry");
                }
                Err(e) => {
                    warn!(task_id = %task_id, error = %e, "file skipped");
                    errors.push(e.to_string());
                }
            }
        }

        if let Err(e) = archive.finish() {
            error!(task_id = %task_id, error = %e, "failed to finalize zip file");
            errors.push(format!("failed to finalize zip file: {}", e));
        }

        let failed = errors.len();
        let result_url = format!("{}/{}", ARCHIVE_ROUTE_PREFIX, file_name);
        task.finish(result_url, errors).await;

        info!(
            task_id = %task_id,
            succeeded = file_urls.len().saturating_sub(failed),
            failed,
            "finished processing task"
        );
    }

    /// Filter, fetch, and stream one URL into a new archive entry
    ///
    /// Returns the entry name and the number of bytes written. A failure while
    /// streaming leaves the partial entry in place.
    async fn append_file(
        &self,
        archive: &mut ZipWriter<File>,
        url: &str,
    ) -> Result<(String, u64), FileError> {
        if !is_allowed_extension(url, &self.allowed_extensions) {
            return Err(FileError::NotAllowed {
                url: url.to_string(),
            });
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FileError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FileError::Status {
                url: url.to_string(),
                status,
            });
        }

        let name = entry_name_from_url(url);
        archive
            .start_file(name.as_str(), entry_options())
            .map_err(|source| FileError::CreateEntry {
                name: name.clone(),
                source,
            })?;

        let mut written = 0u64;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| FileError::Write {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            archive.write_all(&chunk).map_err(|e| FileError::Write {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            written += chunk.len() as u64;
        }

        Ok((name, written))
    }
}

fn entry_options() -> FileOptions {
    FileOptions::default().compression_method(zip::CompressionMethod::Deflated)
}
