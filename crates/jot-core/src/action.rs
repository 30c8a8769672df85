//! Action types — the structured intent derived from free-form text.
//!
//! An [`Action`] is transient: constructed per request by a resolver, checked
//! by the validator, executed, and discarded. Nothing here is persisted.

use serde::{Deserialize, Serialize};

/// The four operations a request can resolve to. A `read` without a target
/// means "list every note the caller owns".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
  Create,
  Read,
  Update,
  Delete,
}

impl Operation {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Create => "create",
      Self::Read => "read",
      Self::Update => "update",
      Self::Delete => "delete",
    }
  }
}

/// Which note an operation acts on: an exact id, or a case-insensitive
/// substring matched against titles. A title hint that matches more than one
/// note is an ambiguity error at execution time, never a silent pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Target {
  Id(i64),
  Title(String),
}

/// The settable note attributes carried by `create` and `update` actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionFields {
  pub title: Option<String>,
  pub body:  Option<String>,
}

/// Which resolver produced the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedBy {
  Llm,
  Fallback,
}

/// A validated intent, ready for execution. The raw input text rides along
/// for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
  pub operation:   Operation,
  pub target:      Option<Target>,
  pub fields:      ActionFields,
  pub resolved_by: ResolvedBy,
  pub raw_text:    String,
}

/// An *untrusted* candidate action as produced by a resolver, before
/// validation. Field aliases accept the vocabulary older model replies use
/// (`action`/`topic`/`message`); unrecognised fields are ignored so a newer
/// model reply never fails to parse outright.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAction {
  #[serde(alias = "action")]
  pub operation: Option<String>,
  #[serde(alias = "topic")]
  pub title:     Option<String>,
  #[serde(alias = "message", alias = "content")]
  pub body:      Option<String>,
  pub note_id:   Option<i64>,
  pub target:    Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn raw_action_accepts_legacy_field_names() {
    let raw: RawAction = serde_json::from_str(
      r#"{"action":"create","topic":"demo","message":"slides due Friday"}"#,
    )
    .unwrap();
    assert_eq!(raw.operation.as_deref(), Some("create"));
    assert_eq!(raw.title.as_deref(), Some("demo"));
    assert_eq!(raw.body.as_deref(), Some("slides due Friday"));
  }

  #[test]
  fn raw_action_ignores_unknown_fields() {
    let raw: RawAction = serde_json::from_str(
      r#"{"operation":"read","note_id":4,"confidence":0.9,"summary":"x"}"#,
    )
    .unwrap();
    assert_eq!(raw.operation.as_deref(), Some("read"));
    assert_eq!(raw.note_id, Some(4));
  }
}
