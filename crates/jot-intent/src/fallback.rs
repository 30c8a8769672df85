//! The deterministic fallback parser.
//!
//! Keyword-and-pattern resolution with no I/O and no failure modes beyond
//! `Unsupported`: for any input string this returns a candidate action or
//! declines, but never panics and never blocks. It is the resilience
//! backstop when the LLM endpoint is down; its accuracy is intentionally
//! limited, its availability is not.
//!
//! Heuristics, in order:
//! - a `note 2` / `note #2` / trailing bare integer token becomes the id;
//! - the first matching trigger word picks the operation (create, update,
//!   delete, read — anything else defaults to a list-all read);
//! - text after ` about ` is the title, text after ` saying ` or ` that `
//!   is the body, and whatever words remain (minus articles and filler)
//!   become the title hint for targeted operations.

use std::sync::LazyLock;

use jot_core::{action::RawAction, note::NoteSummary};
use regex::Regex;

use crate::{error::ResolveError, resolver::IntentResolver};

static NOTE_ID: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"note[\s#-]*(\d+)").expect("note-id pattern"));

const CREATE_TRIGGERS: &[&str] = &["create", "add", "new", "remember"];
const UPDATE_TRIGGERS: &[&str] = &["update", "change", "edit"];
const DELETE_TRIGGERS: &[&str] = &["delete", "remove", "trash"];
const READ_TRIGGERS: &[&str] =
  &["what", "show", "view", "read", "find", "list", "detail", "all"];

/// Filler words stripped when distilling a title hint out of the remaining
/// text ("delete the groceries note" → "groceries").
const FILLER: &[&str] = &[
  "the", "a", "an", "my", "me", "i", "to", "of", "for", "please", "note",
  "notes", "did", "say", "about", "everything",
];

/// The always-available resolver of last resort.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackParser;

impl FallbackParser {
  /// Map raw text to a candidate action. Total: the only failure is
  /// [`ResolveError::Unsupported`] for input with nothing to interpret.
  pub fn parse(raw_text: &str) -> Result<RawAction, ResolveError> {
    let text = raw_text.trim();
    if text.is_empty() {
      return Err(ResolveError::Unsupported);
    }
    let lowered = text.to_lowercase();
    let note_id = extract_note_id(&lowered);

    if triggered(&lowered, CREATE_TRIGGERS) {
      let (head, body) = split_body(text);
      let (_, title) = split_about(head);
      let title = title.map(str::trim).map(str::to_owned);
      // With neither clause marker present the whole text is the body.
      let body = body
        .map(str::trim)
        .map(str::to_owned)
        .or_else(|| title.is_none().then(|| text.to_owned()));
      return Ok(RawAction {
        operation: Some("create".to_owned()),
        title,
        body,
        note_id: None,
        target: None,
      });
    }

    if triggered(&lowered, UPDATE_TRIGGERS) {
      let (head, body) = split_body(text);
      let (rest, about) = split_about(head);
      // With an explicit id the about-clause names the new title;
      // without one it names the note being updated.
      let (title, target) = if note_id.is_some() {
        (about.map(str::trim).map(str::to_owned), None)
      } else {
        (
          None,
          about
            .map(|a| a.trim().to_lowercase())
            .or_else(|| title_hint(rest)),
        )
      };
      return Ok(RawAction {
        operation: Some("update".to_owned()),
        title,
        body: body.map(str::trim).map(str::to_owned),
        note_id,
        target,
      });
    }

    if triggered(&lowered, DELETE_TRIGGERS) {
      let (head, _) = split_body(text);
      let (rest, about) = split_about(head);
      let target = if note_id.is_some() {
        None
      } else {
        about
          .map(|a| a.trim().to_lowercase())
          .or_else(|| title_hint(rest))
      };
      return Ok(RawAction {
        operation: Some("delete".to_owned()),
        title: None,
        body: None,
        note_id,
        target,
      });
    }

    // Read, explicitly triggered or by default. Only an explicit trigger
    // gets a target extracted; bare text lists everything.
    let target = if triggered(&lowered, READ_TRIGGERS) && note_id.is_none() {
      let (head, _) = split_body(text);
      let (rest, about) = split_about(head);
      about
        .map(|a| a.trim().to_lowercase())
        .or_else(|| title_hint(rest))
    } else {
      None
    };
    let note_id = if triggered(&lowered, READ_TRIGGERS) { note_id } else { None };

    Ok(RawAction {
      operation: Some("read".to_owned()),
      title: None,
      body: None,
      note_id,
      target,
    })
  }
}

impl IntentResolver for FallbackParser {
  async fn resolve(
    &self,
    raw_text: &str,
    _notes: &[NoteSummary],
  ) -> Result<RawAction, ResolveError> {
    Self::parse(raw_text)
  }
}

// ─── Extraction helpers ──────────────────────────────────────────────────────

fn triggered(lowered: &str, words: &[&str]) -> bool {
  words.iter().any(|w| lowered.contains(w))
}

/// `note 2`, `note #2`, `note-2`, or a trailing bare integer token.
fn extract_note_id(lowered: &str) -> Option<i64> {
  if let Some(caps) = NOTE_ID.captures(lowered) {
    return caps.get(1).and_then(|m| m.as_str().parse().ok());
  }
  lowered
    .split_whitespace()
    .next_back()
    .map(strip_punct)
    .and_then(|w| w.parse().ok())
}

/// ASCII-case-insensitive substring search. Markers are ASCII, so the
/// returned byte offsets are always valid slice boundaries.
fn find_marker(text: &str, marker: &str) -> Option<(usize, usize)> {
  let hay = text.as_bytes();
  let pat = marker.as_bytes();
  if pat.len() > hay.len() {
    return None;
  }
  hay
    .windows(pat.len())
    .position(|w| w.eq_ignore_ascii_case(pat))
    .map(|i| (i, i + pat.len()))
}

/// Split off a trailing body clause: `("note about demo", "slides due
/// Friday")` for `note about demo saying slides due Friday`.
fn split_body(text: &str) -> (&str, Option<&str>) {
  for marker in [" saying ", " that "] {
    if let Some((start, end)) = find_marker(text, marker) {
      return (&text[..start], Some(&text[end..]));
    }
  }
  (text, None)
}

/// Split off an about-clause: `("create a note", "demo")` for
/// `create a note about demo`.
fn split_about(text: &str) -> (&str, Option<&str>) {
  match find_marker(text, " about ") {
    Some((start, end)) => (&text[..start], Some(&text[end..])),
    None => (text, None),
  }
}

fn strip_punct(word: &str) -> &str {
  word.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Distill the words that plausibly name a note out of leftover text.
fn title_hint(text: &str) -> Option<String> {
  let is_filler = |w: &str| {
    FILLER.contains(&w)
      || CREATE_TRIGGERS.contains(&w)
      || UPDATE_TRIGGERS.contains(&w)
      || DELETE_TRIGGERS.contains(&w)
      || READ_TRIGGERS.contains(&w)
  };
  let words: Vec<&str> = text
    .split_whitespace()
    .map(strip_punct)
    .filter(|w| !w.is_empty())
    .filter(|w| !is_filler(&w.to_lowercase()))
    .collect();
  if words.is_empty() {
    None
  } else {
    Some(words.join(" ").to_lowercase())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
