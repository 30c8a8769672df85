//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Note ids are native SQLite integers.

use chrono::{DateTime, Utc};
use jot_core::{note::Note, user::User};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub username:      String,
  pub password_hash: String,
  pub created_at:    String,
  pub last_login:    Option<String>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      username:      self.username,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
      last_login:    self.last_login.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw strings read directly from a `notes` row.
pub struct RawNote {
  pub note_id:    i64,
  pub owner_id:   String,
  pub title:      String,
  pub body:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawNote {
  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      note_id:    self.note_id,
      owner_id:   decode_uuid(&self.owner_id)?,
      title:      self.title,
      body:       self.body,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
