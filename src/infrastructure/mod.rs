//! Infrastructure layer for storage integrations.
//!
//! This layer implements the repository interface defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - In-memory and PostgreSQL repository implementations

pub mod persistence;
