//! JSON HTTP layer for jot.
//!
//! Exposes an axum [`Router`] backed by any [`jot_core::store::NoteStore`]:
//! structured CRUD routes for clients that know what they want, and
//! `POST /query` for the ones that type it in plain language. Everything
//! except `/register` requires HTTP Basic auth; the verified account is the
//! owner every store operation is scoped to.

pub mod auth;
pub mod error;
pub mod notes;
pub mod query;
pub mod users;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use jot_core::store::NoteStore;
use jot_intent::{Dispatcher, OllamaResolver, ResolverConfig};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `JOT_`-prefixed environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub llm:        ResolverConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_owned(),
      port:       8080,
      store_path: PathBuf::from("jot.db"),
      llm:        ResolverConfig::default(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S: NoteStore> {
  pub store:      Arc<S>,
  pub dispatcher: Arc<Dispatcher<S, OllamaResolver>>,
}

// Manual impl: `#[derive(Clone)]` would demand `S: Clone`, which the Arcs
// make unnecessary.
impl<S: NoteStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:      self.store.clone(),
      dispatcher: self.dispatcher.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: NoteStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/register", post(users::register::<S>))
    .route("/notes", get(notes::list::<S>).post(notes::create::<S>))
    .route(
      "/notes/{id}",
      get(notes::get_one::<S>)
        .put(notes::update_one::<S>)
        .delete(notes::delete_one::<S>),
    )
    .route("/query", post(query::handler::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
