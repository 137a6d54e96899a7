//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::codec::Codec;
use crate::domain::errors::RepositoryError;
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::persistence::transaction::finish;

/// PostgreSQL repository storing one row per distinct URL in `urls`.
///
/// Identifiers come from the table's sequence, which starts at 0. The
/// capacity bound is checked here rather than in the schema because the
/// identifier space is defined by the codec.
///
/// Saves of the same URL are serialized with a transaction-scoped advisory
/// lock, so a URL saved concurrently still consumes exactly one identifier.
pub struct PgUrlRepository<C: Codec> {
    pool: Arc<PgPool>,
    codec: Arc<C>,
    capacity: u64,
}

impl<C: Codec> PgUrlRepository<C> {
    /// Creates a new repository with a database connection pool.
    ///
    /// The effective capacity is `max_size` bounded by what the codec can represent.
    pub fn new(pool: Arc<PgPool>, codec: Arc<C>, max_size: u64) -> Self {
        let capacity = max_size.min(codec.capacity());

        Self {
            pool,
            codec,
            capacity,
        }
    }

    /// Maximum number of URLs this repository will store.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Number of stored URLs.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] on database errors.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let count = sqlx::query_scalar!(r#"SELECT COUNT(*) AS "count!" FROM urls"#)
            .fetch_one(self.pool.as_ref())
            .await?;

        to_id(count)
    }

    /// Identifier the next stored URL will receive.
    ///
    /// Read from `urls_id_seq`, so values lost to rolled back inserts are
    /// accounted for. Saves start failing with
    /// [`RepositoryError::RepositoryIsFull`] once this reaches the capacity.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Database`] on database errors.
    pub async fn next_id(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query!(
            r#"SELECT last_value AS "last_value!", is_called AS "is_called!" FROM urls_id_seq"#
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        let next = if row.is_called {
            row.last_value.saturating_add(1)
        } else {
            row.last_value
        };

        to_id(next)
    }

    async fn save_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        original_url: &str,
    ) -> Result<String, RepositoryError> {
        // Writers of the same URL queue here, so only the first one reaches
        // the sequence and the rest find its committed row.
        lock_url(tx, original_url).await?;

        if let Some(code) = self.find_code(tx, original_url).await? {
            tracing::debug!(code = %code, "url already stored");
            return Ok(code);
        }

        let Some(id) = insert_url(tx, original_url).await? else {
            // Inserted outside this repository and committed after our lookup.
            tracing::debug!("url inserted concurrently, reusing stored code");
            return self
                .find_code(tx, original_url)
                .await?
                .ok_or(RepositoryError::Database(sqlx::Error::RowNotFound));
        };

        if id >= self.capacity {
            tracing::warn!(id, capacity = self.capacity, "postgres repository is full");
            return Err(RepositoryError::RepositoryIsFull);
        }

        let code = self.codec.encode(id)?;
        update_short_url(tx, id, &code).await?;

        tracing::debug!(id, code = %code, "url stored");

        Ok(code)
    }

    async fn find_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        original_url: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let row = sqlx::query!(
            "SELECT id, short_url FROM urls WHERE url = $1",
            original_url
        )
        .fetch_optional(&mut **tx)
        .await?;

        match row {
            None => Ok(None),
            Some(row) => match row.short_url {
                Some(code) => Ok(Some(code)),
                None => Ok(Some(self.codec.encode(to_id(row.id)?)?)),
            },
        }
    }
}

/// Takes a transaction-scoped advisory lock keyed by the URL's hash.
async fn lock_url(
    tx: &mut Transaction<'_, Postgres>,
    original_url: &str,
) -> Result<(), RepositoryError> {
    sqlx::query_scalar!(
        r#"SELECT 1 AS "locked!" FROM pg_advisory_xact_lock(hashtextextended($1, 0))"#,
        original_url
    )
    .fetch_one(&mut **tx)
    .await?;

    Ok(())
}

async fn insert_url(
    tx: &mut Transaction<'_, Postgres>,
    original_url: &str,
) -> Result<Option<u64>, RepositoryError> {
    let id = sqlx::query_scalar!(
        r#"
        INSERT INTO urls (url)
        VALUES ($1)
        ON CONFLICT (url) DO NOTHING
        RETURNING id
        "#,
        original_url
    )
    .fetch_optional(&mut **tx)
    .await?;

    id.map(to_id).transpose()
}

async fn update_short_url(
    tx: &mut Transaction<'_, Postgres>,
    id: u64,
    code: &str,
) -> Result<(), RepositoryError> {
    sqlx::query!(
        "UPDATE urls SET short_url = $1 WHERE id = $2",
        code,
        to_row_id(id)?
    )
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn to_id(raw: i64) -> Result<u64, RepositoryError> {
    u64::try_from(raw).map_err(|_| RepositoryError::InvalidIdentifier(raw))
}

fn to_row_id(id: u64) -> Result<i64, RepositoryError> {
    i64::try_from(id).map_err(|_| RepositoryError::RepositoryIsFull)
}

#[async_trait]
impl<C: Codec + 'static> UrlRepository for PgUrlRepository<C> {
    async fn save_url(&self, original_url: &str) -> Result<String, RepositoryError> {
        if original_url.is_empty() {
            return Err(RepositoryError::EmptyUrl);
        }

        let mut tx = self.pool.begin().await?;
        let result = self.save_in(&mut tx, original_url).await;
        finish(tx, result).await
    }

    async fn get_url(&self, code: &str) -> Result<String, RepositoryError> {
        let id = self.codec.decode(code)?;

        if id >= self.capacity {
            return Err(RepositoryError::UrlNotFound);
        }

        let Ok(row_id) = i64::try_from(id) else {
            return Err(RepositoryError::UrlNotFound);
        };

        let url = sqlx::query_scalar!("SELECT url FROM urls WHERE id = $1", row_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        url.filter(|url| !url.is_empty())
            .ok_or(RepositoryError::UrlNotFound)
    }
}
