//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the file-archiver REST
//! API using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the file-archiver REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "file-archiver REST API",
        version = "0.1.0",
        description = "Collects file URLs into tasks and bundles the downloaded files into zip archives",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Tasks
        crate::api::routes::create_task,
        crate::api::routes::add_file,
        crate::api::routes::get_task,

        // Archives
        crate::api::routes::download_archive,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        crate::types::TaskId,
        crate::types::Status,
        crate::types::TaskInfo,
        crate::types::AddFileRequest,
        crate::types::FileAccepted,

        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "tasks", description = "Tasks - Create tasks, add file URLs, poll status"),
        (name = "archives", description = "Archives - Download finished zip archives"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec"),
    )
)]
pub struct ApiDoc;
