//! The response composer: executed action + result → what the caller sees.

use jot_core::{
  action::{Action, Operation, ResolvedBy},
  note::Note,
};
use serde::Serialize;

/// The machine-readable outcome of one executed action.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionResult {
  Created { note: Note },
  Fetched { note: Note },
  Listed { notes: Vec<Note> },
  Updated { note: Note },
  Deleted { note_id: i64, title: String },
}

/// Everything the presentation layer gets back for one request: a human
/// summary, the structured result, and the caller's refreshed note list.
/// `notes` always reflects post-execution state; empty is a valid snapshot,
/// not an error.
#[derive(Debug, Serialize)]
pub struct QueryOutcome {
  pub summary:     String,
  pub operation:   Operation,
  pub resolved_by: ResolvedBy,
  pub result:      ActionResult,
  pub notes:       Vec<Note>,
}

/// Build the outcome for a completed action.
pub fn compose(action: &Action, result: ActionResult, notes: Vec<Note>) -> QueryOutcome {
  let mut summary = match &result {
    ActionResult::Created { note } => {
      format!("Created note {} {:?}.", note.note_id, note.title)
    }
    ActionResult::Fetched { note } => {
      format!("Found note {} {:?}.", note.note_id, note.title)
    }
    ActionResult::Listed { notes } => match notes.len() {
      0 => "You have no notes yet.".to_owned(),
      1 => "You have 1 note.".to_owned(),
      n => format!("You have {n} notes."),
    },
    ActionResult::Updated { note } => {
      format!("Updated note {} {:?}.", note.note_id, note.title)
    }
    ActionResult::Deleted { note_id, title } => {
      format!("Deleted note {note_id} {title:?}.")
    }
  };
  if action.resolved_by == ResolvedBy::Fallback {
    summary.push_str(" (interpreted by keyword match)");
  }

  QueryOutcome {
    summary,
    operation: action.operation,
    resolved_by: action.resolved_by,
    result,
    notes,
  }
}
