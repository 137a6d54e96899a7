//! Transaction scoping for PostgreSQL repositories.
//!
//! A repository operation begins a transaction, threads `&mut tx` through its
//! steps and hands the outcome to [`finish`], which commits on success and
//! rolls back on failure. If the operation's future is dropped before
//! reaching [`finish`], `sqlx` rolls the transaction back when the handle is
//! dropped, so cancellation never leaves partial writes behind.
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let result = insert_row(&mut tx, url).await;
//! finish(tx, result).await
//! ```

use sqlx::{Postgres, Transaction};

use crate::domain::errors::RepositoryError;

/// Commits `tx` if `result` is `Ok`, otherwise rolls it back.
///
/// # Errors
///
/// Returns the commit error if committing fails, the original error if it
/// was rolled back, or [`RepositoryError::RollbackFailed`] carrying both
/// errors if the rollback failed as well.
pub async fn finish<T>(
    tx: Transaction<'_, Postgres>,
    result: Result<T, RepositoryError>,
) -> Result<T, RepositoryError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => Err(rollback(tx, err).await),
    }
}

/// Rolls `tx` back and folds a rollback failure into `err`.
pub async fn rollback(tx: Transaction<'_, Postgres>, err: RepositoryError) -> RepositoryError {
    match tx.rollback().await {
        Ok(()) => err,
        Err(rollback) => {
            tracing::error!(error = %rollback, "transaction rollback failed");
            RepositoryError::RollbackFailed {
                source: Box::new(err),
                rollback,
            }
        }
    }
}
