//! HTTP server initialization and runtime setup.
//!
//! Builds the codec and the configured repository, then runs the Axum
//! server until Ctrl-C or SIGTERM.

use crate::config::{Config, StorageType, mask_connection_string};
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::persistence::{InMemoryUrlRepository, PgUrlRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::AlphabetCodec;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The short code codec from `ALPHABET` and `LENGTH`
/// - The repository selected by `STORAGE_TYPE` (PostgreSQL pool and
///   migrations for the `postgres` backend)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The codec configuration is invalid
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let codec = Arc::new(
        AlphabetCodec::new(&config.alphabet, config.length)
            .context("Invalid ALPHABET/LENGTH configuration")?,
    );

    let (repository, pool): (Arc<dyn UrlRepository>, Option<PgPool>) = match config.storage_type
    {
        StorageType::InMemory => {
            let repo = InMemoryUrlRepository::new(codec, config.max_size);
            tracing::info!(capacity = repo.capacity(), "Using in-memory storage");
            let repo: Arc<dyn UrlRepository> = Arc::new(repo);
            (repo, None)
        }
        StorageType::Postgres => {
            let pool = connect_pool(&config).await?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to apply migrations")?;
            tracing::info!("Migrations applied");

            let repo = PgUrlRepository::new(Arc::new(pool.clone()), codec, config.max_size);
            tracing::info!(capacity = repo.capacity(), "Using postgres storage");
            let repo: Arc<dyn UrlRepository> = Arc::new(repo);
            (repo, Some(pool))
        }
    };

    let state = AppState::new(repository, config.storage_type);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Server stopped");

    Ok(())
}

/// Opens a PostgreSQL pool using the pool settings from `config`.
///
/// # Errors
///
/// Returns an error if no database URL is configured or the connection fails.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set for postgres storage")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to {}",
                mask_connection_string(database_url)
            )
        })?;

    tracing::info!("Connected to database");

    Ok(pool)
}

/// Resolves when the process receives Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
