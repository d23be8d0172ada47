//! v001 -- Initial schema creation.
//!
//! Creates the three collections: `users`, `events`, and `meetings`.
//! There are no foreign keys between them; records only relate by
//! identifier at the application layer.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    user_name     TEXT NOT NULL,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,               -- bcrypt, cost factor 12
    role          TEXT NOT NULL DEFAULT 'member',
    created_at    TEXT NOT NULL                -- ISO-8601 / RFC-3339
);

-- ----------------------------------------------------------------
-- Events
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS events (
    id          TEXT PRIMARY KEY NOT NULL,     -- UUID v4
    image       TEXT,                          -- nullable asset URL
    title       TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    date        TEXT NOT NULL DEFAULT '',      -- calendar date as text
    time        TEXT NOT NULL DEFAULT '',
    location    TEXT NOT NULL DEFAULT '',
    category    TEXT NOT NULL DEFAULT '',
    for_whom    TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_events_date ON events(date);

-- ----------------------------------------------------------------
-- Meetings
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS meetings (
    id          TEXT PRIMARY KEY NOT NULL,     -- UUID v4
    image       TEXT NOT NULL DEFAULT '',
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    date        TEXT NOT NULL,
    time        TEXT NOT NULL,
    location    TEXT NOT NULL,
    for_whom    TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_meetings_date ON meetings(date);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
