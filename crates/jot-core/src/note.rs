//! Note types — the unit of content in the jot store.
//!
//! A note belongs to exactly one owner; `owner_id` never changes after
//! creation. `note_id` is a store-assigned integer, stable for the life of
//! the note, and is the form users reference in text ("update note 2").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored note. `created_at` and `updated_at` are server-assigned;
/// `updated_at` is bumped on every successful update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
  pub note_id:    i64,
  pub owner_id:   Uuid,
  pub title:      String,
  pub body:       String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Note {
  /// The id-and-title digest handed to intent resolvers as context.
  pub fn summary(&self) -> NoteSummary {
    NoteSummary {
      note_id: self.note_id,
      title:   self.title.clone(),
    }
  }
}

/// Input to [`crate::store::NoteStore::create_note`].
/// Timestamps and the note id are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewNote {
  pub title: String,
  pub body:  String,
}

/// A partial update. `None` fields are left untouched; the store applies
/// all provided fields in a single statement, or none.
#[derive(Debug, Clone, Default)]
pub struct NoteUpdate {
  pub title: Option<String>,
  pub body:  Option<String>,
}

/// The minimal per-note context shared with an intent resolver: enough to
/// let it map "the groceries note" to an id, and nothing more.
#[derive(Debug, Clone, Serialize)]
pub struct NoteSummary {
  pub note_id: i64,
  pub title:   String,
}
