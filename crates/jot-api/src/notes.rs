//! Handlers for the structured `/notes` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/notes` | Optional `?title=<substring>` filter |
//! | `POST`   | `/notes` | Body: [`CreateBody`]; returns 201 + stored note |
//! | `GET`    | `/notes/:id` | 404 if not the caller's |
//! | `PUT`    | `/notes/:id` | Body: [`UpdateBody`]; partial update |
//! | `DELETE` | `/notes/:id` | 204 on success |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use jot_core::{
  note::{NewNote, Note, NoteUpdate},
  store::NoteStore,
};
use serde::Deserialize;

use crate::{AppState, auth::AuthUser, error::ApiError};

fn store_err<E>(e: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  ApiError::Store(Box::new(e))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Case-insensitive substring filter on titles.
  pub title: Option<String>,
}

/// `GET /notes[?title=<substring>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Note>>, ApiError>
where
  S: NoteStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let notes = match params.title.as_deref() {
    Some(needle) => state
      .store
      .find_by_title(user.user_id, needle)
      .await
      .map_err(store_err)?,
    None => state.store.list_notes(user.user_id).await.map_err(store_err)?,
  };
  Ok(Json(notes))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title: String,
  pub body:  String,
}

/// `POST /notes` — returns 201 + the stored note.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: NoteStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.title.trim().is_empty() && body.body.trim().is_empty() {
    return Err(ApiError::BadRequest(
      "a note needs a title or a body".to_owned(),
    ));
  }

  let note = state
    .store
    .create_note(user.user_id, NewNote {
      title: body.title,
      body:  body.body,
    })
    .await
    .map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(note)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /notes/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Path(id): Path<i64>,
) -> Result<Json<Note>, ApiError>
where
  S: NoteStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let note = state
    .store
    .note(user.user_id, id)
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("note {id} not found")))?;
  Ok(Json(note))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub title: Option<String>,
  pub body:  Option<String>,
}

/// `PUT /notes/:id` — partial update; omitted fields are left untouched.
pub async fn update_one<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Path(id): Path<i64>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Note>, ApiError>
where
  S: NoteStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.title.is_none() && body.body.is_none() {
    return Err(ApiError::BadRequest("nothing to update".to_owned()));
  }

  let note = state
    .store
    .update_note(user.user_id, id, NoteUpdate {
      title: body.title,
      body:  body.body,
    })
    .await
    .map_err(store_err)?
    .ok_or_else(|| ApiError::NotFound(format!("note {id} not found")))?;
  Ok(Json(note))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /notes/:id` — 204 on success.
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
  S: NoteStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if !state
    .store
    .delete_note(user.user_id, id)
    .await
    .map_err(store_err)?
  {
    return Err(ApiError::NotFound(format!("note {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
