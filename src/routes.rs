//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`   - Short link redirect
//! - `GET  /`         - 400, the code segment is missing
//! - `GET  /healthz`  - Liveness check
//! - `/api/links*`    - Link management (JSON)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Open policy for the browser dashboard
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, missing_code_handler, redirect_handler};
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the router with all routes and middleware, without path
/// normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(missing_code_handler))
        .route("/healthz", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api::routes::link_routes())
        .with_state(state)
        .layer(cors::layer())
        .layer(tracing::layer())
}

/// Constructs the served application: [`router`] behind trailing-slash
/// normalization, which has to wrap the router to affect route matching.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
