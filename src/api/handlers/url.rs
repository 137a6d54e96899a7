//! Handlers for storing and resolving URLs.

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde_json::json;

use crate::api::dto::url::{GetUrlParams, UrlRequest, UrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a short code to the original URL.
///
/// # Endpoint
///
/// `GET /url?short_url=<code>`
///
/// # Response Codes
///
/// - **200 OK**: `{"url": "<original>"}`
/// - **400 Bad Request**: missing parameter or malformed code
/// - **404 Not Found**: no URL stored under the code
/// - **500 Internal Server Error**: storage failure
pub async fn get_url_handler(
    State(state): State<AppState>,
    params: Result<Query<GetUrlParams>, QueryRejection>,
) -> Result<Json<UrlResponse>, AppError> {
    let Query(params) = params?;

    let code = params
        .short_url
        .filter(|code| !code.is_empty())
        .ok_or_else(|| {
            AppError::bad_request(
                "Missing query parameter",
                json!({ "field": "short_url" }),
            )
        })?;

    let url = state.repository.get_url(&code).await.map_err(|e| {
        tracing::debug!(code = %code, error = %e, "lookup failed");
        AppError::from(e)
    })?;

    Ok(Json(UrlResponse { url }))
}

/// Stores a URL and returns its short code.
///
/// Saving an already stored URL returns the code assigned the first time.
///
/// # Endpoint
///
/// `POST /url`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response Codes
///
/// - **200 OK**: `{"url": "<code>"}`
/// - **400 Bad Request**: invalid body, missing or empty `url`, or the repository is full
/// - **500 Internal Server Error**: storage failure
pub async fn save_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<UrlResponse>, AppError> {
    let Json(payload) = payload?;

    let url = payload
        .url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::bad_request("URL must not be empty", json!({ "field": "url" })))?;

    let code = state.repository.save_url(&url).await.map_err(|e| {
        tracing::warn!(error = %e, "failed to store url");
        AppError::from(e)
    })?;

    Ok(Json(UrlResponse { url: code }))
}
