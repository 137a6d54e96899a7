//! Typed errors produced by the codec and the repositories.

use thiserror::Error;

/// Errors raised while building a codec or converting between identifiers
/// and short codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The configured code length is zero.
    #[error("length must be greater than 0")]
    InvalidLength,

    /// The configured alphabet has no symbols.
    #[error("alphabet must not be empty")]
    InvalidAlphabet,

    /// The identifier does not fit into `base^length` codes.
    #[error("number overflow, too large to encode")]
    NumberOverflow,

    /// The code does not have exactly `length` symbols.
    #[error("invalid string length: expected {expected}, got {actual}")]
    InvalidStringLength { expected: usize, actual: usize },

    /// The code contains a symbol outside the alphabet.
    #[error("invalid character in string: {0:?}")]
    InvalidCharacter(char),
}

/// Errors returned by [`crate::domain::repositories::UrlRepository`] implementations.
///
/// Callers match on the variant to tell "not found" apart from a full
/// repository or a persistence failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A codec error, surfaced unchanged.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Every identifier below the capacity has been assigned.
    #[error("repository is full")]
    RepositoryIsFull,

    /// The code is well-formed but no URL is stored under it.
    #[error("url not found")]
    UrlNotFound,

    /// The store returned an identifier outside the `u64` range.
    #[error("store returned an invalid identifier: {0}")]
    InvalidIdentifier(i64),

    /// `save_url` was called with an empty URL.
    #[error("url must not be empty")]
    EmptyUrl,

    /// The database rejected or failed a query.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The operation failed and rolling the transaction back failed too.
    #[error("{source}; rollback failed: {rollback}")]
    RollbackFailed {
        source: Box<RepositoryError>,
        rollback: sqlx::Error,
    },
}

impl RepositoryError {
    /// Returns `true` if the error means the requested URL does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UrlNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_error_is_transparent_through_repository_error() {
        let err = RepositoryError::from(CodecError::NumberOverflow);
        assert_eq!(err.to_string(), "number overflow, too large to encode");
        assert!(matches!(
            err,
            RepositoryError::Codec(CodecError::NumberOverflow)
        ));
    }

    #[test]
    fn rollback_failure_keeps_both_errors_visible() {
        let err = RepositoryError::RollbackFailed {
            source: Box::new(RepositoryError::RepositoryIsFull),
            rollback: sqlx::Error::PoolClosed,
        };

        let message = err.to_string();
        assert!(message.starts_with("repository is full"));
        assert!(message.contains("rollback failed"));
    }

    #[test]
    fn only_url_not_found_is_not_found() {
        assert!(RepositoryError::UrlNotFound.is_not_found());
        assert!(!RepositoryError::RepositoryIsFull.is_not_found());
        assert!(!RepositoryError::EmptyUrl.is_not_found());
        assert!(!RepositoryError::from(CodecError::InvalidCharacter('!')).is_not_found());
    }
}
