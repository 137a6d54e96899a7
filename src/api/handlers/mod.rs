//! HTTP request handlers for API endpoints.

pub mod health;
pub mod url;

pub use health::health_handler;
pub use url::{get_url_handler, save_url_handler};
