//! Intent resolution and CRUD dispatch for jot.
//!
//! Turns free-form text like "create a note about demo saying slides due
//! Friday" into a validated [`jot_core::action::Action`] and executes it
//! against a [`jot_core::store::NoteStore`], strictly scoped to the caller.
//!
//! Resolution is a two-variant chain with a fixed order: the LLM-backed
//! [`OllamaResolver`] is tried first; whenever it is unreachable or its
//! reply is unusable, the deterministic [`FallbackParser`] takes over. Only
//! those two conditions trigger the fallthrough — any error after an action
//! has been validated is terminal for the request.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fallback;
pub mod llm;
pub mod resolver;
pub mod respond;
pub mod validate;

pub use config::ResolverConfig;
pub use dispatch::Dispatcher;
pub use error::{DispatchError, ResolveError, SchemaError};
pub use fallback::FallbackParser;
pub use llm::OllamaResolver;
pub use resolver::IntentResolver;
pub use respond::{ActionResult, QueryOutcome};
