//! # URL Compressor
//!
//! A URL shortening service that maps long URLs to fixed-length codes over a
//! configurable alphabet, built with Axum and PostgreSQL.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Codec and repository traits, typed errors
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory and PostgreSQL repositories
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//! - **Utilities** ([`utils`]) - The alphabet codec
//!
//! ## Features
//!
//! - Bijective short codes of a fixed length over any alphabet
//! - Deduplication: re-saving a URL returns its existing code
//! - Bounded capacity per repository instance
//! - Transactional PostgreSQL storage with automatic rollback
//!
//! ## Quick Start
//!
//! ```bash
//! export STORAGE_TYPE="in-memory"
//! export ALPHABET="0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_"
//! export LENGTH="10"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::domain::{Codec, CodecError, RepositoryError, repositories::UrlRepository};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::{InMemoryUrlRepository, PgUrlRepository};
    pub use crate::state::AppState;
    pub use crate::utils::code_generator::AlphabetCodec;
}
