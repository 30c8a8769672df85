//! SQLite backend for the jot note store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Because every statement executes on
//! that one connection thread, concurrent mutations of the same note are
//! serialised by construction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
