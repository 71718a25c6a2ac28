//! SQL schema for the Trail SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS books (
    id           TEXT PRIMARY KEY,
    created_at   TEXT NOT NULL,   -- RFC 3339 UTC, fixed nanosecond precision
    updated_at   TEXT,            -- NULL until the first update
    user_id      TEXT NOT NULL,
    title        TEXT NOT NULL,
    author       TEXT NOT NULL,
    book_status  INTEGER NOT NULL, -- 0 = draft, 1 = active
    book_attrs   TEXT NOT NULL    -- JSON
);

CREATE TABLE IF NOT EXISTS servers (
    id             TEXT PRIMARY KEY,
    created_at     TEXT NOT NULL,
    updated_at     TEXT,
    user_id        TEXT NOT NULL,
    title          TEXT NOT NULL,
    author         TEXT NOT NULL,
    server_status  INTEGER NOT NULL,
    server_attrs   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS info (
    id           TEXT PRIMARY KEY,
    created_at   TEXT NOT NULL,
    updated_at   TEXT,
    user_id      TEXT NOT NULL,
    name         TEXT NOT NULL,
    portfolio    TEXT NOT NULL,
    info_status  INTEGER NOT NULL,
    info_attrs   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS books_created_idx   ON books(created_at);
CREATE INDEX IF NOT EXISTS servers_created_idx ON servers(created_at);
CREATE INDEX IF NOT EXISTS info_created_idx    ON info(created_at);

PRAGMA user_version = 1;
";
