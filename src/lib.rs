use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod authorizer;
pub mod config;
pub mod error;
pub mod handlers;
pub mod keygen;
pub mod models;
pub mod service;
pub mod store;

use authorizer::AccessGateway;
use service::LinkService;

// ── Shared application state ───────────────────────────────────────────────

/// Everything a request handler needs. Constructed once at startup; requests
/// share nothing else — all remaining state lives in the external store and
/// registry behind the service and gateway.
pub struct AppState {
    pub service: LinkService,
    pub gateway: AccessGateway,
    pub config: config::AppConfig,
}

// ── Router ─────────────────────────────────────────────────────────────────

/// Build the request router: creation and resolution endpoints, everything
/// else (including mismatched methods on known paths) a 404 with an empty
/// body.
pub fn router(state: Arc<AppState>) -> Router {
    async fn not_found() -> StatusCode {
        StatusCode::NOT_FOUND
    }

    Router::new()
        .route(
            "/api/v1/links",
            post(handlers::links::create).fallback(not_found),
        )
        .route("/:key", get(handlers::links::resolve).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
}
