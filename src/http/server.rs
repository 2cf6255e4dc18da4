//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all API handlers
//! - Serve the front-end assets at `/` and `/static`
//! - Wire up middleware (request ID, tracing, CORS, timeout, body limit)
//! - Bind server to listener and shut down on Ctrl+C

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigRegistry, Settings};
use crate::error::ApiError;
use crate::files::{BackupManager, PathResolver};
use crate::history::HistoryProvider;
use crate::http::handlers;

/// Largest accepted request body. Config files are hand-edited text;
/// anything above this is a mistake, not a dotfile.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Whole-request deadline, VCS subprocess time included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ConfigRegistry>,
    pub resolver: PathResolver,
    pub backups: BackupManager,
    pub history: HistoryProvider,
}

/// HTTP server for the dashboard.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server from startup settings.
    pub fn new(settings: &Settings, registry: Arc<ConfigRegistry>) -> Self {
        let state = AppState {
            registry,
            resolver: PathResolver::new(settings.root.clone()),
            backups: BackupManager::new(settings.backups_dir()),
            history: HistoryProvider::new(settings.root.clone()),
        };

        Self::with_state(state, &settings.static_dir)
    }

    /// Create a server around prebuilt state. Tests use this to swap in
    /// fake collaborators.
    pub fn with_state(state: AppState, static_dir: &Path) -> Self {
        Self {
            router: build_router(state, static_dir),
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
fn build_router(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/configs", get(handlers::list_configs))
        .route(
            "/api/configs/{id}",
            get(handlers::get_config).put(handlers::put_config),
        )
        .route("/api/brew/{category}", get(handlers::brew_category))
        .route("/api/history/{id}", get(handlers::get_history))
        .route("/api/history/{id}/{commit}", get(handlers::get_diff))
        .with_state(state)
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::map_response(method_not_allowed_as_not_found))
        .layer(
            // Outermost first. CORS sits outside timeout and body limit so
            // even their rejections carry the permissive headers.
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors)
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
}

/// Method routers and `ServeDir` answer 405 for verbs they do not serve;
/// the dashboard treats those as unknown paths.
async fn method_not_allowed_as_not_found(response: Response) -> Response {
    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        return ApiError::not_found("Not Found").into_response();
    }
    response
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
