//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`tasks`] - Task creation, file submission, status
//! - [`archives`] - Download of finished archives
//! - [`system`] - Health and OpenAPI

mod archives;
mod tasks;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use archives::*;
pub use system::*;
pub use tasks::*;
