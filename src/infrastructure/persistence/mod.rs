//! Storage backends implementing [`crate::domain::repositories::UrlRepository`].
//!
//! # Repositories
//!
//! - [`InMemoryUrlRepository`] - Process-local storage, one lock per instance
//! - [`PgUrlRepository`] - PostgreSQL storage, one transaction per write
//!
//! [`transaction`] holds the commit/rollback helpers used by the PostgreSQL backend.

pub mod memory_url_repository;
pub mod pg_url_repository;
pub mod transaction;

pub use memory_url_repository::InMemoryUrlRepository;
pub use pg_url_repository::PgUrlRepository;
