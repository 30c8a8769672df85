//! Error taxonomy for intent resolution and dispatch.

use thiserror::Error;

/// Why a resolver failed to produce a candidate action.
///
/// `Unavailable` and `Malformed` are the two conditions that trigger the
/// fallback chain; `Unsupported` is the deterministic parser's total-function
/// answer for input it cannot interpret at all.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// The external endpoint was unreachable or timed out.
  #[error("intent service unavailable: {0}")]
  Unavailable(String),

  /// The endpoint replied, but the reply could not be parsed into a
  /// candidate action.
  #[error("intent reply malformed: {0}")]
  Malformed(String),

  /// The input carries nothing to interpret (e.g. empty text).
  #[error("unsupported input")]
  Unsupported,
}

/// A candidate action rejected by the schema validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
  #[error("candidate action names no operation")]
  MissingOperation,

  #[error("unknown operation: {0:?}")]
  UnknownOperation(String),

  #[error("create needs a title or a body")]
  EmptyCreate,

  #[error("{0} needs a target note")]
  MissingTarget(&'static str),

  #[error("update needs at least one field to set")]
  EmptyUpdate,

  #[error("target must be a note id or non-empty text")]
  BlankTarget,
}

/// A terminal request error. Everything here is reported to the caller as a
/// structured result, never a crash; the offending raw text is preserved
/// where it aids diagnostics.
#[derive(Debug, Error)]
pub enum DispatchError {
  /// No resolver produced a usable action for this input.
  #[error("could not understand the request: {raw_text:?}")]
  IntentUnresolved { raw_text: String },

  /// The target resolved to no note of the caller's. A note owned by
  /// someone else reports identically — existence never leaks.
  #[error("no matching note")]
  NotFound,

  /// A title hint matched more than one note and no id disambiguated it.
  #[error("{count} notes match {target:?}; give a note id to disambiguate")]
  Ambiguous { target: String, count: usize },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}
