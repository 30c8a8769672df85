//! HTTP Basic-auth extractor backed by per-user argon2 hashes.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use jot_core::{store::NoteStore, user::User};
use rand_core::OsRng;

use crate::{AppState, error::ApiError};

/// Present in a handler's arguments means the request carried valid
/// credentials; the wrapped [`User`] is the acting owner.
pub struct AuthUser(pub User);

/// Hash a plaintext password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

impl<S> FromRequestParts<AppState<S>> for AuthUser
where
  S: NoteStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header_val = parts
      .headers
      .get(axum::http::header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(ApiError::Unauthorized)?;

    let encoded = header_val
      .strip_prefix("Basic ")
      .ok_or(ApiError::Unauthorized)?;

    let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
    let creds = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;
    let (username, password) =
      creds.split_once(':').ok_or(ApiError::Unauthorized)?;

    let user = state
      .store
      .user_by_name(username)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?
      .ok_or(ApiError::Unauthorized)?;

    let parsed_hash =
      PasswordHash::new(&user.password_hash).map_err(|_| ApiError::Unauthorized)?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed_hash)
      .map_err(|_| ApiError::Unauthorized)?;

    state
      .store
      .touch_last_login(user.user_id)
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;

    Ok(AuthUser(user))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::http::{Request, header};
  use jot_intent::{Dispatcher, OllamaResolver};
  use jot_store_sqlite::SqliteStore;

  use super::*;

  async fn make_state(username: &str, password: &str) -> AppState<SqliteStore> {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    let hash = hash_password(password).unwrap();
    store
      .create_user(username.to_owned(), hash)
      .await
      .unwrap();
    let dispatcher =
      Arc::new(Dispatcher::<_, OllamaResolver>::new(store.clone(), None));
    AppState { store, dispatcher }
  }

  async fn extract(
    req: Request<axum::body::Body>,
    state: &AppState<SqliteStore>,
  ) -> Result<AuthUser, ApiError> {
    let (mut parts, _) = req.into_parts();
    AuthUser::from_request_parts(&mut parts, state).await
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  #[tokio::test]
  async fn correct_credentials() {
    let state = make_state("alice", "secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("alice", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    let user = extract(req, &state).await.unwrap();
    assert_eq!(user.0.username, "alice");
  }

  #[tokio::test]
  async fn auth_touches_last_login() {
    let state = make_state("alice", "secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("alice", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    extract(req, &state).await.unwrap();

    let user = state.store.user_by_name("alice").await.unwrap().unwrap();
    assert!(user.last_login.is_some());
  }

  #[tokio::test]
  async fn wrong_password() {
    let state = make_state("alice", "secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("alice", "wrong"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn unknown_user() {
    let state = make_state("alice", "secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, basic("mallory", "secret"))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn missing_header() {
    let state = make_state("alice", "secret").await;
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn invalid_base64() {
    let state = make_state("alice", "secret").await;
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic !!!not-base64!!!")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthorized)
    ));
  }
}
