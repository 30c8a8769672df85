//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use jot_intent::DispatchError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// No resolver could turn the text into a usable action. Reported with
  /// the offending input so the caller sees what was misunderstood.
  #[error("could not understand the request")]
  IntentUnresolved { raw_text: String },

  #[error("internal error: {0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<DispatchError> for ApiError {
  fn from(e: DispatchError) -> Self {
    match e {
      DispatchError::IntentUnresolved { raw_text } => {
        ApiError::IntentUnresolved { raw_text }
      }
      DispatchError::NotFound => ApiError::NotFound("no matching note".to_owned()),
      DispatchError::Ambiguous { .. } => ApiError::Conflict(e.to_string()),
      DispatchError::Store(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match &self {
      ApiError::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"jot\"")],
        Json(json!({ "error": "unauthorized" })),
      )
        .into_response(),
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Conflict(m) => {
        (StatusCode::CONFLICT, Json(json!({ "error": m }))).into_response()
      }
      ApiError::IntentUnresolved { raw_text } => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
          "error":    "could not understand the request",
          "raw_text": raw_text,
        })),
      )
        .into_response(),
      ApiError::Internal(m) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": m })),
      )
        .into_response(),
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
