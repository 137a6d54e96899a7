use anyhow::Result;
use std::env;
use tracing_subscriber::EnvFilter;
use url_compressor::config;
use url_compressor::server;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Installed before the config is loaded so its warnings are not lost.
    init_tracing();

    let config = config::load_from_env()?;
    config.print_summary();

    server::run(config).await
}

/// Installs the global subscriber from `RUST_LOG` and `LOG_FORMAT`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}
