//! API route configuration.

use crate::api::handlers::{get_url_handler, save_url_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// URL routes.
///
/// # Endpoints
///
/// - `GET  /url?short_url=<code>` - Resolve a short code
/// - `POST /url`                  - Store a URL and return its code
pub fn url_routes() -> Router<AppState> {
    Router::new().route("/url", get(get_url_handler).post(save_url_handler))
}
