//! Handler for `POST /register`.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jot_core::store::NoteStore;
use serde::Deserialize;

use crate::{AppState, auth::hash_password, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub username: String,
  pub password: String,
}

/// `POST /register` — body: `{"username":"...","password":"..."}`.
/// The one unauthenticated route. Returns 201 with the new account, 409 if
/// the username is taken.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: NoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let username = body.username.trim();
  if username.len() < 3 || username.len() > 64 {
    return Err(ApiError::BadRequest(
      "username must be 3-64 characters".to_owned(),
    ));
  }
  if body.password.len() < 6 {
    return Err(ApiError::BadRequest(
      "password must be at least 6 characters".to_owned(),
    ));
  }

  if state
    .store
    .user_by_name(username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .is_some()
  {
    return Err(ApiError::Conflict("username taken".to_owned()));
  }

  let hash = hash_password(&body.password)?;
  let user = state
    .store
    .create_user(username.to_owned(), hash)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((StatusCode::CREATED, Json(user)))
}
