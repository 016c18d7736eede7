//! Mail index database schema
//!
//! DDL for the persisted index the SQLite adapter reads. The adapter
//! itself never writes; the creation helpers here exist so fixtures and
//! embedding tools can produce well-formed index files.

use rusqlite::Connection;

/// Current schema version, stored in `PRAGMA user_version`
pub const SCHEMA_VERSION: u32 = 1;

/// One row per indexed message. `in_reply_to` is NULL for top-level
/// messages; `date` is the sort key for result ordering.
const CREATE_MESSAGES_TABLE: &str = "
CREATE TABLE IF NOT EXISTS messages (
    id          INTEGER PRIMARY KEY,
    message_id  TEXT NOT NULL UNIQUE,
    thread_id   TEXT NOT NULL,
    subject     TEXT NOT NULL DEFAULT '',
    sender      TEXT NOT NULL DEFAULT '',
    date        INTEGER NOT NULL DEFAULT 0,
    in_reply_to TEXT
)";

/// One row per file holding a copy of a message
const CREATE_FILENAMES_TABLE: &str = "
CREATE TABLE IF NOT EXISTS filenames (
    message_id  TEXT NOT NULL REFERENCES messages(message_id),
    path        TEXT NOT NULL,
    UNIQUE (message_id, path)
)";

const CREATE_THREAD_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_messages_thread ON messages(thread_id)";

const CREATE_FILENAMES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_filenames_message ON filenames(message_id)";

/// Create all tables and indexes for a message index database.
pub fn create_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(CREATE_MESSAGES_TABLE, [])?;
    conn.execute(CREATE_FILENAMES_TABLE, [])?;
    conn.execute(CREATE_THREAD_INDEX, [])?;
    conn.execute(CREATE_FILENAMES_INDEX, [])?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}
