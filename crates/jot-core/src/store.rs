//! The `NoteStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `jot-store-sqlite`).
//! Higher layers (`jot-intent`, `jot-api`) depend on this abstraction, not
//! on any concrete backend.
//!
//! Every note method takes the acting owner and is scoped to it: a note id
//! that exists but belongs to someone else is indistinguishable from a note
//! that does not exist (`None`, `false`, or an empty list). Existence never
//! leaks across owners.

use std::future::Future;

use uuid::Uuid;

use crate::{
  note::{NewNote, Note, NoteUpdate},
  user::User,
};

/// Abstraction over a jot storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait NoteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a new account. The password hash must already be a
  /// PHC string; this layer never sees plaintext.
  fn create_user(
    &self,
    username: String,
    password_hash: String,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Look up an account by its unique username. Returns `None` if absent.
  fn user_by_name<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Record a successful authentication.
  fn touch_last_login(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Notes ─────────────────────────────────────────────────────────────

  /// Persist a new note for `owner`. The id and both timestamps are set by
  /// the store.
  fn create_note(
    &self,
    owner: Uuid,
    input: NewNote,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + '_;

  /// Retrieve one of `owner`'s notes by id. Returns `None` if the id does
  /// not exist *or* belongs to a different owner.
  fn note(
    &self,
    owner: Uuid,
    id: i64,
  ) -> impl Future<Output = Result<Option<Note>, Self::Error>> + Send + '_;

  /// All of `owner`'s notes whose title contains `needle`,
  /// case-insensitively, ordered by id.
  fn find_by_title<'a>(
    &'a self,
    owner: Uuid,
    needle: &'a str,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + 'a;

  /// All of `owner`'s notes, most recently updated first.
  fn list_notes(
    &self,
    owner: Uuid,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + '_;

  /// Apply `patch` to one of `owner`'s notes. Provided fields are written
  /// together with a fresh `updated_at` in a single statement; `None`
  /// fields are untouched. Returns the updated note, or `None` if the id
  /// is not one of `owner`'s notes.
  fn update_note(
    &self,
    owner: Uuid,
    id: i64,
    patch: NoteUpdate,
  ) -> impl Future<Output = Result<Option<Note>, Self::Error>> + Send + '_;

  /// Delete one of `owner`'s notes. Returns `false` if the id is not one
  /// of `owner`'s notes.
  fn delete_note(
    &self,
    owner: Uuid,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
