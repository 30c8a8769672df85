//! The LLM-backed resolver, speaking the Ollama generate API.
//!
//! One request, one reply, one attempt: retrying a timed-out call would
//! risk executing an action twice if the timeout races a slow success.
//! The reply is untrusted text; everything it claims goes through the
//! schema validator before any CRUD step runs.

use jot_core::{action::RawAction, note::NoteSummary};
use serde::Deserialize;
use serde_json::json;

use crate::{config::ResolverConfig, error::ResolveError, resolver::IntentResolver};

/// Instructions sent with every request. The reply contract matches
/// [`RawAction`]: one JSON object, nothing else.
const SYSTEM_PROMPT: &str = "\
You interpret requests for a personal notes service. Reply with exactly one \
JSON object and no other text:

{\"operation\": \"create\" | \"read\" | \"update\" | \"delete\",
 \"title\": string or null,
 \"body\": string or null,
 \"note_id\": integer or null,
 \"target\": string or null}

Rules:
- \"create\" needs a title and/or a body.
- \"read\" fetches one note when note_id or target is set, otherwise it \
lists every note.
- \"update\" and \"delete\" need note_id or target.
- note_id is an integer; if the user says 'note 2', set note_id to 2.
- target is matched case-insensitively against note titles; prefer note_id \
from the provided note list when the reference is clear.
- Never invent note ids that are not in the provided list.";

/// Resolver backed by an Ollama-compatible completion endpoint.
pub struct OllamaResolver {
  client:   reqwest::Client,
  base_url: String,
  model:    String,
}

/// The fields of an Ollama generate reply we care about.
#[derive(Debug, Deserialize)]
struct GenerateReply {
  #[serde(default)]
  response: String,
}

impl OllamaResolver {
  /// Build a resolver from config. The timeout bounds the whole request,
  /// connection included.
  pub fn new(config: &ResolverConfig) -> reqwest::Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.timeout())
      .build()?;
    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_owned(),
      model: config.model.clone(),
    })
  }

  fn prompt(raw_text: &str, notes: &[NoteSummary]) -> String {
    let mut prompt = String::new();
    if notes.is_empty() {
      prompt.push_str("The user has no notes yet.\n");
    } else {
      prompt.push_str("The user's notes (id: title):\n");
      for note in notes {
        prompt.push_str(&format!("- {}: {}\n", note.note_id, note.title));
      }
    }
    prompt.push_str("\nRequest: ");
    prompt.push_str(raw_text);
    prompt
  }
}

impl IntentResolver for OllamaResolver {
  async fn resolve(
    &self,
    raw_text: &str,
    notes: &[NoteSummary],
  ) -> Result<RawAction, ResolveError> {
    let body = json!({
      "model":  self.model,
      "system": SYSTEM_PROMPT,
      "prompt": Self::prompt(raw_text, notes),
      "stream": false,
    });

    let response = self
      .client
      .post(format!("{}/api/generate", self.base_url))
      .json(&body)
      .send()
      .await
      .map_err(|e| ResolveError::Unavailable(e.to_string()))?;

    if !response.status().is_success() {
      return Err(ResolveError::Unavailable(format!(
        "endpoint returned {}",
        response.status()
      )));
    }

    let reply: GenerateReply = response
      .json()
      .await
      .map_err(|e| ResolveError::Malformed(e.to_string()))?;

    parse_reply(&reply.response)
  }
}

/// Extract the JSON action object from the reply text. Code fences and
/// surrounding prose are tolerated; a reply with no parseable object in it
/// is malformed.
fn parse_reply(text: &str) -> Result<RawAction, ResolveError> {
  let candidate = extract_json_object(text)
    .ok_or_else(|| ResolveError::Malformed("no JSON object in reply".to_owned()))?;
  serde_json::from_str(candidate).map_err(|e| ResolveError::Malformed(e.to_string()))
}

/// The slice from the first `{` to the last `}`, if both exist in order.
fn extract_json_object(text: &str) -> Option<&str> {
  let start = text.find('{')?;
  let end = text.rfind('}')?;
  (end > start).then(|| &text[start..=end])
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_a_bare_json_reply() {
    let raw =
      parse_reply(r#"{"operation":"create","title":"demo","body":"x"}"#).unwrap();
    assert_eq!(raw.operation.as_deref(), Some("create"));
    assert_eq!(raw.title.as_deref(), Some("demo"));
  }

  #[test]
  fn strips_code_fences_and_prose() {
    let reply = "Sure! Here is the action:\n```json\n{\"operation\":\"delete\",\"note_id\":3}\n```\n";
    let raw = parse_reply(reply).unwrap();
    assert_eq!(raw.operation.as_deref(), Some("delete"));
    assert_eq!(raw.note_id, Some(3));
  }

  #[test]
  fn reply_without_json_is_malformed() {
    assert!(matches!(
      parse_reply("I deleted the note for you."),
      Err(ResolveError::Malformed(_))
    ));
    assert!(matches!(
      parse_reply(""),
      Err(ResolveError::Malformed(_))
    ));
  }

  #[test]
  fn prompt_lists_note_context() {
    let notes = vec![
      NoteSummary { note_id: 1, title: "Groceries".to_owned() },
      NoteSummary { note_id: 4, title: "Work".to_owned() },
    ];
    let prompt = OllamaResolver::prompt("delete the groceries note", &notes);
    assert!(prompt.contains("- 1: Groceries"));
    assert!(prompt.contains("- 4: Work"));
    assert!(prompt.ends_with("delete the groceries note"));
  }
}
