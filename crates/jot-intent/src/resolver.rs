//! The `IntentResolver` trait — the seam between the dispatcher and
//! anything that turns raw text into a candidate action.
//!
//! Implemented by [`crate::OllamaResolver`] (network-backed) and
//! [`crate::FallbackParser`] (deterministic, always available). Tests
//! implement it with scripted fakes, so dispatch policy is verifiable
//! without any live endpoint.

use std::future::Future;

use jot_core::{action::RawAction, note::NoteSummary};

use crate::error::ResolveError;

/// Attempt to turn `raw_text` into an *untrusted* candidate action.
///
/// `notes` is the caller's current note digest (ids and titles only) —
/// the minimal context a resolver needs to ground references like
/// "the groceries note".
pub trait IntentResolver: Send + Sync {
  fn resolve<'a>(
    &'a self,
    raw_text: &'a str,
    notes: &'a [NoteSummary],
  ) -> impl Future<Output = Result<RawAction, ResolveError>> + Send + 'a;
}
