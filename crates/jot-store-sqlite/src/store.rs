//! [`SqliteStore`] — the SQLite implementation of [`NoteStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use jot_core::{
  note::{NewNote, Note, NoteUpdate},
  store::NoteStore,
  user::User,
};

use crate::{
  Error, Result,
  encode::{RawNote, RawUser, encode_dt, encode_uuid},
  schema::SCHEMA,
};

const NOTE_COLUMNS: &str =
  "note_id, owner_id, title, body, created_at, updated_at";

fn note_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawNote> {
  Ok(RawNote {
    note_id:    row.get(0)?,
    owner_id:   row.get(1)?,
    title:      row.get(2)?,
    body:       row.get(3)?,
    created_at: row.get(4)?,
    updated_at: row.get(5)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A jot note store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── NoteStore impl ──────────────────────────────────────────────────────────

impl NoteStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(
    &self,
    username: String,
    password_hash: String,
  ) -> Result<User> {
    let user = User {
      user_id: Uuid::new_v4(),
      username,
      password_hash,
      created_at: Utc::now(),
      last_login: None,
    };

    let id_str   = encode_uuid(user.user_id);
    let name     = user.username.clone();
    let hash     = user.password_hash.clone();
    let at_str   = encode_dt(user.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, username, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, hash, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn user_by_name(&self, username: &str) -> Result<Option<User>> {
    let name = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, username, password_hash, created_at, last_login
               FROM users WHERE username = ?1",
              rusqlite::params![name],
              |row| {
                Ok(RawUser {
                  user_id:       row.get(0)?,
                  username:      row.get(1)?,
                  password_hash: row.get(2)?,
                  created_at:    row.get(3)?,
                  last_login:    row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn touch_last_login(&self, user_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(user_id);
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET last_login = ?2 WHERE user_id = ?1",
          rusqlite::params![id_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Notes ─────────────────────────────────────────────────────────────────

  async fn create_note(&self, owner: Uuid, input: NewNote) -> Result<Note> {
    let now       = Utc::now();
    let owner_str = encode_uuid(owner);
    let title     = input.title.clone();
    let body      = input.body.clone();
    let at_str    = encode_dt(now);

    let note_id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notes (owner_id, title, body, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![owner_str, title, body, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Note {
      note_id,
      owner_id: owner,
      title: input.title,
      body: input.body,
      created_at: now,
      updated_at: now,
    })
  }

  async fn note(&self, owner: Uuid, id: i64) -> Result<Option<Note>> {
    let owner_str = encode_uuid(owner);

    let raw: Option<RawNote> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {NOTE_COLUMNS} FROM notes
                 WHERE note_id = ?1 AND owner_id = ?2"
              ),
              rusqlite::params![id, owner_str],
              note_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawNote::into_note).transpose()
  }

  async fn find_by_title(&self, owner: Uuid, needle: &str) -> Result<Vec<Note>> {
    let owner_str = encode_uuid(owner);
    let pattern   = format!("%{}%", needle.to_lowercase());

    let raws: Vec<RawNote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {NOTE_COLUMNS} FROM notes
           WHERE owner_id = ?1 AND LOWER(title) LIKE ?2
           ORDER BY note_id ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str, pattern], note_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNote::into_note).collect()
  }

  async fn list_notes(&self, owner: Uuid) -> Result<Vec<Note>> {
    let owner_str = encode_uuid(owner);

    let raws: Vec<RawNote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {NOTE_COLUMNS} FROM notes
           WHERE owner_id = ?1
           ORDER BY updated_at DESC, note_id DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], note_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNote::into_note).collect()
  }

  async fn update_note(
    &self,
    owner: Uuid,
    id: i64,
    patch: NoteUpdate,
  ) -> Result<Option<Note>> {
    let owner_str = encode_uuid(owner);
    let at_str    = encode_dt(Utc::now());

    // Single UPDATE plus the read-back run inside one closure, so both
    // execute on the connection thread with nothing interleaved between.
    let raw: Option<RawNote> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE notes SET
             title      = COALESCE(?3, title),
             body       = COALESCE(?4, body),
             updated_at = ?5
           WHERE note_id = ?1 AND owner_id = ?2",
          rusqlite::params![id, owner_str, patch.title, patch.body, at_str],
        )?;

        if changed == 0 {
          return Ok(None);
        }

        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {NOTE_COLUMNS} FROM notes
                 WHERE note_id = ?1 AND owner_id = ?2"
              ),
              rusqlite::params![id, owner_str],
              note_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawNote::into_note).transpose()
  }

  async fn delete_note(&self, owner: Uuid, id: i64) -> Result<bool> {
    let owner_str = encode_uuid(owner);

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM notes WHERE note_id = ?1 AND owner_id = ?2",
          rusqlite::params![id, owner_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}
