//! DTOs for the URL endpoints.

use serde::{Deserialize, Serialize};

/// Request body for `POST /url`.
///
/// `url` is optional here so a missing field is reported through the
/// error envelope instead of a bare rejection.
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: Option<String>,
}

/// Query parameters for `GET /url`.
#[derive(Debug, Deserialize)]
pub struct GetUrlParams {
    pub short_url: Option<String>,
}

/// Response body of both URL endpoints.
///
/// Holds the short code after a save and the original URL after a lookup.
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlResponse {
    pub url: String,
}
