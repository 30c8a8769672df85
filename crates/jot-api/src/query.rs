//! The natural-language endpoint.
//!
//! `POST /query` takes a free-text request, runs it through the
//! [`Dispatcher`](jot_intent::Dispatcher), and returns the structured
//! [`QueryOutcome`] describing what was done.

use axum::{Json, extract::State};
use jot_core::store::NoteStore;
use jot_intent::QueryOutcome;
use serde::Deserialize;

use crate::{AppState, auth::AuthUser, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct QueryBody {
  pub query: String,
}

/// `POST /query`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  AuthUser(user): AuthUser,
  Json(body): Json<QueryBody>,
) -> Result<Json<QueryOutcome>, ApiError>
where
  S: NoteStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if body.query.trim().is_empty() {
    return Err(ApiError::BadRequest("query must not be empty".to_owned()));
  }

  let outcome = state.dispatcher.handle(user.user_id, &body.query).await?;
  Ok(Json(outcome))
}
