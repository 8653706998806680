//! Cross-origin access for the browser dashboard.

use tower_http::cors::{Any, CorsLayer};

/// Allows any origin, method and header. No credentials are exposed.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
