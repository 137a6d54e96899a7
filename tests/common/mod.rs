#![allow(dead_code)]

use sqlx::PgPool;
use std::sync::Arc;
use url_compressor::config::StorageType;
use url_compressor::domain::repositories::UrlRepository;
use url_compressor::infrastructure::persistence::{InMemoryUrlRepository, PgUrlRepository};
use url_compressor::state::AppState;
use url_compressor::utils::code_generator::AlphabetCodec;

pub const ALPHABET: &str = "abc";
pub const LENGTH: usize = 5;

pub fn test_codec() -> Arc<AlphabetCodec> {
    Arc::new(AlphabetCodec::new(ALPHABET, LENGTH).unwrap())
}

pub fn create_pg_repository(pool: PgPool, max_size: u64) -> PgUrlRepository<AlphabetCodec> {
    PgUrlRepository::new(Arc::new(pool), test_codec(), max_size)
}

pub async fn count_urls(pool: &PgPool) -> i64 {
    sqlx::query_scalar!(r#"SELECT COUNT(*) AS "count!" FROM urls"#)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn insert_raw_url(pool: &PgPool, id: i64, url: &str, short_url: Option<&str>) {
    sqlx::query!(
        "INSERT INTO urls (id, url, short_url) VALUES ($1, $2, $3)",
        id,
        url,
        short_url
    )
    .execute(pool)
    .await
    .unwrap();
}

pub async fn stored_code(pool: &PgPool, url: &str) -> Option<String> {
    sqlx::query_scalar!("SELECT short_url FROM urls WHERE url = $1", url)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn idle_in_transaction(pool: &PgPool) -> i64 {
    sqlx::query_scalar!(
        r#"
        SELECT COUNT(*) AS "count!"
        FROM pg_stat_activity
        WHERE datname = current_database() AND state = 'idle in transaction'
        "#
    )
    .fetch_one(pool)
    .await
    .unwrap()
}

pub fn create_memory_state(max_size: u64) -> AppState {
    let repository: Arc<dyn UrlRepository> =
        Arc::new(InMemoryUrlRepository::new(test_codec(), max_size));

    AppState::new(repository, StorageType::InMemory)
}

pub fn create_pg_state(pool: PgPool, max_size: u64) -> AppState {
    let repository: Arc<dyn UrlRepository> = Arc::new(create_pg_repository(pool, max_size));

    AppState::new(repository, StorageType::Postgres)
}
