//! Repository trait for URL storage.

use crate::domain::errors::RepositoryError;
use async_trait::async_trait;

/// Repository interface mapping original URLs to short codes.
///
/// Both operations are safe to call concurrently from many tasks. Dropping
/// a pending call cancels it without leaving partial writes behind.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - process-local storage
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Stores `original_url` and returns its short code.
    ///
    /// Saving a URL that is already stored returns the existing code and
    /// does not consume a new identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::EmptyUrl`] for an empty URL, before any
    /// identifier is allocated.
    ///
    /// Returns [`RepositoryError::RepositoryIsFull`] once every identifier
    /// below the capacity is taken.
    ///
    /// Returns [`RepositoryError::Codec`] if the identifier cannot be encoded.
    ///
    /// Returns [`RepositoryError::Database`] on persistence errors.
    async fn save_url(&self, original_url: &str) -> Result<String, RepositoryError>;

    /// Resolves a short code to the original URL.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Codec`] if the code is malformed.
    ///
    /// Returns [`RepositoryError::UrlNotFound`] if no URL is stored under the code.
    ///
    /// Returns [`RepositoryError::Database`] on persistence errors.
    async fn get_url(&self, code: &str) -> Result<String, RepositoryError>;
}
