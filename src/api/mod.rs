//! REST API server module
//!
//! Provides an OpenAPI 3 compliant REST API for creating archive tasks,
//! submitting file URLs, polling task status, and downloading archives.

use crate::{Config, FileArchiver, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Tasks
/// - `POST /tasks` - Create a task
/// - `POST /tasks/:id/files` - Add a file URL to a task
/// - `GET /tasks/:id` - Get task status
///
/// ## Archives
/// - `GET /archives/:filename` - Download a finished archive
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(archiver: Arc<FileArchiver>, config: Arc<Config>) -> Router {
    let state = AppState::new(archiver, config.clone());

    let router = Router::new()
        // Tasks
        .route("/tasks", post(routes::create_task))
        .route("/tasks/:id", get(routes::get_task))
        .route("/tasks/:id/files", post(routes::add_file))
        // Archives
        .route("/archives/:filename", get(routes::download_archive))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    // Merge Swagger UI routes if enabled in config (before applying state)
    // Note: the UI serves its own copy of the spec so it cannot clash with /openapi.json
    let router = if config.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    // Add state to all routes
    let router = router.with_state(state).layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config
    if config.api.cors_enabled {
        let cors = build_cors_layer(&config.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// CORS layer for the configured origins
///
/// An empty list or a `"*"` entry allows any origin. Entries that are not
/// valid header values are skipped.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server on the configured bind address.
///
/// Runs until `shutdown` is cancelled. New connections stop being accepted
/// at that point and in-flight requests get `config.api.shutdown_grace` to
/// finish before the server is dropped.
///
/// # Example
///
/// ```no_run
/// use file_archiver::{Config, FileArchiver};
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let archiver = Arc::new(FileArchiver::new((*config).clone()).await?);
///
/// // Start API server (blocks until shutdown)
/// file_archiver::api::start_api_server(archiver, config, CancellationToken::new()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(
    archiver: Arc<FileArchiver>,
    config: Arc<Config>,
    shutdown: CancellationToken,
) -> Result<()> {
    let bind_address = config.api.bind_address();

    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let grace = config.api.shutdown_grace;
    let app = create_router(archiver, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(
        address = %bind_address,
        "API server listening"
    );

    serve_until_cancelled(listener, app, shutdown, grace).await?;

    tracing::info!("API server stopped");
    Ok(())
}

/// Serve `app` on `listener`, draining for at most `grace` once `shutdown` fires
async fn serve_until_cancelled(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
    grace: Duration,
) -> Result<()> {
    let signal = shutdown.clone();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move { signal.cancelled().await });
    let mut server = std::pin::pin!(server.into_future());

    tokio::select! {
        result = &mut server => {
            return result.map_err(|e| crate::error::Error::ApiServerError(e.to_string()));
        }
        _ = shutdown.cancelled() => {}
    }

    tracing::info!(grace_secs = grace.as_secs(), "Draining in-flight requests");

    match tokio::time::timeout(grace, server).await {
        Ok(result) => result.map_err(|e| crate::error::Error::ApiServerError(e.to_string())),
        Err(_) => {
            tracing::warn!("Shutdown grace period elapsed, dropping open connections");
            Ok(())
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
