//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reject an empty code with 400
/// 2. Resolve the code (404 if unknown)
/// 3. Queue a visit for the background worker (fire-and-forget)
/// 4. Return 302 Found with the stored URL as `Location`, verbatim
///
/// # Errors
///
/// Returns 400 Bad Request if the code is empty.
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    if code.trim().is_empty() {
        return Err(missing_code());
    }

    let original_url = state.link_service.resolve_and_visit(&code).await?;

    Ok(found(&original_url))
}

/// Answers `GET /` where the code segment is absent.
pub async fn missing_code_handler() -> AppError {
    missing_code()
}

fn missing_code() -> AppError {
    AppError::bad_request("Bad request", json!({ "reason": "short code is required" }))
}

/// Builds a 302 response. `axum::response::Redirect` only offers 303/307/308.
fn found(location: &str) -> Response {
    match header::HeaderValue::try_from(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => AppError::storage(
            "Stored URL is not a valid Location header",
            json!({ "url": location }),
        )
        .into_response(),
    }
}
