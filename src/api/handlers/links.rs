//! Handlers for link management endpoints (create, list, get, delete).

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse, OkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "code": "promo24"   // optional, [A-Za-z0-9]{6,8}
/// }
/// ```
///
/// # Response Codes
///
/// - **201 Created**: the new link record
/// - **400 Bad Request**: invalid URL, invalid code format or malformed body
/// - **409 Conflict**: the custom code is already taken
/// - **500 Internal Server Error**: storage failure
pub async fn create_link_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid JSON body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;

    let url = payload.url()?;
    let custom_code = payload.custom_code()?;

    let link = state.link_service.create_link(url, custom_code).await?;

    Ok((StatusCode::CREATED, Json(link.into())))
}

/// Lists every link, newest first.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links().await?;

    Ok(Json(links.into_iter().map(LinkResponse::from).collect()))
}

/// Returns a single link with its visit counters.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn get_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.get_link(&code).await?;

    Ok(Json(link.into()))
}

/// Permanently deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Response
///
/// `{"ok": true}`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<OkResponse>, AppError> {
    state.link_service.delete_link(&code).await?;

    Ok(Json(OkResponse::ok()))
}
