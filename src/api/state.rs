//! Application state for the API server

use crate::{Config, FileArchiver};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the archiver instance and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The main FileArchiver instance
    pub archiver: Arc<FileArchiver>,

    /// Configuration (read-only after startup)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(archiver: Arc<FileArchiver>, config: Arc<Config>) -> Self {
        Self { archiver, config }
    }
}
