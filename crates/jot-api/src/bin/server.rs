//! jot server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API plus the natural-language
//! `/query` endpoint over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use jot_api::{AppState, ServerConfig};
use jot_intent::{Dispatcher, OllamaResolver};
use jot_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "jot notes server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("JOT"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  // The resolver is skipped entirely in fallback-only mode; the dispatcher
  // then goes straight to the keyword parser.
  let resolver = if server_cfg.llm.fallback_only {
    tracing::info!("LLM resolution disabled, keyword fallback only");
    None
  } else {
    tracing::info!(
      base_url = %server_cfg.llm.base_url,
      model = %server_cfg.llm.model,
      "using Ollama for intent resolution"
    );
    Some(
      OllamaResolver::new(&server_cfg.llm)
        .context("failed to build Ollama client")?,
    )
  };

  let state = AppState {
    store:      store.clone(),
    dispatcher: Arc::new(Dispatcher::new(store, resolver)),
  };

  let app = jot_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
