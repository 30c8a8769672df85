//! SQL schema for the jot SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    created_at    TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    last_login    TEXT
);

-- Every note row carries its owner; all queries filter on it.
CREATE TABLE IF NOT EXISTS notes (
    note_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id   TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    title      TEXT NOT NULL,
    body       TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS notes_owner_idx   ON notes(owner_id);
CREATE INDEX IF NOT EXISTS notes_updated_idx ON notes(owner_id, updated_at);

PRAGMA user_version = 1;
";
