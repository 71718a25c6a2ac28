//! trail-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the Trail API over HTTP behind a
//! shared rate limiter.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use trail_api::{AppState, AuthConfig, TokenBucket};
use trail_core::store::Queries;
use trail_server::{ServerConfig, expand_tilde};
use trail_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Trail resource API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Requests admitted per second; overrides `rate_limit`.
  #[arg(long)]
  rps: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config, cli.rps)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  let rate = server_cfg.rate()?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = AppState {
    store: Arc::new(Queries::new(store.clone(), store.clone(), store)),
    auth:  Arc::new(AuthConfig::hs256(server_cfg.jwt_secret.as_bytes())),
  };
  let bucket = Arc::new(TokenBucket::new(rate));

  let app = trail_api::router(state, bucket);
  let address = server_cfg.address();

  tracing::info!(rate_limit = rate.get(), "Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
