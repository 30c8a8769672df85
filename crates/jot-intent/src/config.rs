//! Resolver configuration.
//!
//! Passed into [`crate::Dispatcher`] at construction; nothing in this crate
//! reads ambient process state.

use std::time::Duration;

use serde::Deserialize;

/// Settings for the LLM-backed resolver.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
  /// Base URL of an Ollama-compatible endpoint.
  pub base_url:      String,
  /// Model identifier passed through to the endpoint.
  pub model:         String,
  /// Upper bound on the single resolution request.
  pub timeout_secs:  u64,
  /// Skip the LLM entirely and resolve with the deterministic parser only.
  /// Useful for tests and offline operation.
  pub fallback_only: bool,
}

impl ResolverConfig {
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

impl Default for ResolverConfig {
  fn default() -> Self {
    Self {
      base_url:      "http://localhost:11434".to_owned(),
      model:         "llama3".to_owned(),
      timeout_secs:  120,
      fallback_only: false,
    }
  }
}
