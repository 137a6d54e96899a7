//! CLI administration tool for url-compressor.
//!
//! Inspects codes and storage without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the code assigned to identifier 42
//! cargo run --bin admin -- encode 42
//!
//! # Show the identifier behind a code
//! cargo run --bin admin -- decode aaabb
//!
//! # View storage usage
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `ALPHABET`, `LENGTH` (required): codec configuration
//! - `MAX_SIZE`: capacity used by `stats`
//! - `DATABASE_URL` or `DB_*` components: required by `stats` and `db`

use url_compressor::config::{Config, MAX_LENGTH};
use url_compressor::domain::Codec;
use url_compressor::infrastructure::persistence::PgUrlRepository;
use url_compressor::server::connect_pool;
use url_compressor::utils::code_generator::AlphabetCodec;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing url-compressor.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Print the short code for an identifier
    Encode {
        /// Identifier to encode
        id: u64,
    },

    /// Print the identifier behind a short code
    Decode {
        /// Short code to decode
        code: String,
    },

    /// Show storage statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and show the server version
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    if config.length > MAX_LENGTH {
        anyhow::bail!("LENGTH must be at most {}, got {}", MAX_LENGTH, config.length);
    }
    let codec = AlphabetCodec::new(&config.alphabet, config.length)
        .context("Invalid ALPHABET/LENGTH configuration")?;

    match cli.command {
        Commands::Encode { id } => handle_encode(&codec, id)?,
        Commands::Decode { code } => handle_decode(&codec, &code)?,
        Commands::Stats => {
            let pool = connect_pool(&config).await?;
            handle_stats(pool, codec, config.max_size).await?;
        }
        Commands::Db { action } => {
            let pool = connect_pool(&config).await?;
            handle_db_action(action, &pool).await?;
        }
    }

    Ok(())
}

fn handle_encode(codec: &AlphabetCodec, id: u64) -> Result<()> {
    let code = codec
        .encode(id)
        .with_context(|| format!("Cannot encode {id}"))?;

    println!("{} → {}", id.to_string().bright_white(), code.bright_green().bold());

    Ok(())
}

fn handle_decode(codec: &AlphabetCodec, code: &str) -> Result<()> {
    let id = codec
        .decode(code)
        .with_context(|| format!("Cannot decode '{code}'"))?;

    println!("{} → {}", code.bright_white(), id.to_string().bright_green().bold());

    Ok(())
}

/// Shows:
/// - Number of stored URLs
/// - Effective capacity
/// - Remaining free identifiers, counted from the next sequence value
///   since rolled back inserts leave gaps
async fn handle_stats(pool: PgPool, codec: AlphabetCodec, max_size: u64) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let repo = PgUrlRepository::new(Arc::new(pool), Arc::new(codec), max_size);
    let stored = repo.count().await.context("Failed to count stored URLs")?;
    let next_id = repo
        .next_id()
        .await
        .context("Failed to read the identifier sequence")?;
    let capacity = repo.capacity();
    let remaining = capacity.saturating_sub(next_id);

    println!(
        "  Stored URLs: {}",
        stored.to_string().bright_green().bold()
    );
    println!(
        "  Capacity:    {}",
        capacity.to_string().bright_green().bold()
    );

    let remaining = remaining.to_string();
    let remaining = if next_id >= capacity {
        remaining.red().bold()
    } else {
        remaining.bright_green().bold()
    };
    println!("  Remaining:   {}", remaining);
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
