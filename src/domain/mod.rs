//! Domain layer: contracts and errors shared by every storage backend.
//!
//! # Architecture
//!
//! - [`codec`] - Identifier <-> short code contract
//! - [`repositories`] - Data access trait definitions
//! - [`errors`] - Typed codec and repository errors
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on the HTTP layer
//! - Repository traits define contracts implemented by the infrastructure layer
//!
//! # Request Flow
//!
//! 1. `save_url` checks whether the URL is already stored
//! 2. The next free identifier is reserved and encoded with a [`Codec`]
//! 3. The mapping is persisted and the code returned
//! 4. `get_url` decodes the code, checks bounds and fetches the URL by identifier

pub mod codec;
pub mod errors;
pub mod repositories;

pub use codec::Codec;
pub use errors::{CodecError, RepositoryError};

#[cfg(test)]
pub use codec::MockCodec;
