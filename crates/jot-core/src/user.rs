//! User — the owner identity every note operation is scoped to.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered account. The password hash is an argon2 PHC string; it never
/// leaves the storage and auth layers.
#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub user_id:       Uuid,
  pub username:      String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
  pub last_login:    Option<DateTime<Utc>>,
}
