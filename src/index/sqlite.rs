//! Read-only SQLite index adapter
//!
//! Opens a persisted mail index and serves searches over it. Matching is
//! defined here, not by callers: whitespace-separated terms are ANDed,
//! each term matching as a case-insensitive substring of the subject or
//! sender, with `id:` and `thread:` prefixes for exact identifier lookup.
//! Results come back in date order.

use crate::error::{IndexError, IndexResult};
use crate::index::{IndexedMessage, IndexedThread, MailIndex, MessageStream, ThreadStream};
use rusqlite::{params_from_iter, Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Read-only handle on a mail index database
#[derive(Debug)]
pub struct SqliteIndex {
    conn: Connection,
}

impl SqliteIndex {
    /// Open an existing index file read-only.
    ///
    /// The file must exist and carry the index schema; a missing or
    /// malformed file fails here rather than on first search.
    pub fn open_read_only(path: &Path) -> IndexResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| IndexError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // SQLite opens lazily; probe the schema so a non-index file is
        // rejected up front.
        conn.query_row("SELECT COUNT(*) FROM messages", [], |_row| Ok(()))
            .map_err(|e| IndexError::OpenFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(Self { conn })
    }

    fn matching_message_ids(&self, query: &str) -> IndexResult<Vec<String>> {
        let filter = TermFilter::parse(query);
        let sql = format!(
            "SELECT message_id FROM messages{} ORDER BY date, id",
            filter.where_clause()
        );
        self.run_id_query(query, &sql, &filter)
    }

    fn matching_thread_ids(&self, query: &str) -> IndexResult<Vec<String>> {
        let filter = TermFilter::parse(query);
        let sql = format!(
            "SELECT thread_id FROM messages{} GROUP BY thread_id ORDER BY MIN(date), thread_id",
            filter.where_clause()
        );
        self.run_id_query(query, &sql, &filter)
    }

    fn run_id_query(&self, query: &str, sql: &str, filter: &TermFilter) -> IndexResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql).map_err(|e| query_failed(query, &e))?;
        let rows = stmt
            .query_map(params_from_iter(filter.params.iter()), |row| row.get(0))
            .map_err(|e| query_failed(query, &e))?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row.map_err(|e| query_failed(query, &e))?);
        }
        Ok(ids)
    }
}

impl MailIndex for SqliteIndex {
    fn search_messages<'a>(&'a self, query: &str) -> IndexResult<MessageStream<'a>> {
        let ids = self.matching_message_ids(query)?;
        Ok(Box::new(MessageRows {
            conn: &self.conn,
            ids: ids.into_iter(),
        }))
    }

    fn search_threads<'a>(&'a self, query: &str) -> IndexResult<ThreadStream<'a>> {
        let ids = self.matching_thread_ids(query)?;
        Ok(Box::new(ThreadRows {
            conn: &self.conn,
            ids: ids.into_iter(),
        }))
    }
}

/// WHERE clause assembled from whitespace-separated query terms
struct TermFilter {
    clauses: Vec<String>,
    params: Vec<String>,
}

impl TermFilter {
    fn parse(query: &str) -> Self {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        for term in query.split_whitespace() {
            if let Some(id) = term.strip_prefix("id:") {
                clauses.push("message_id = ?".to_string());
                params.push(id.to_string());
            } else if let Some(thread) = term.strip_prefix("thread:") {
                clauses.push("thread_id = ?".to_string());
                params.push(thread.to_string());
            } else {
                clauses.push("(subject LIKE ? ESCAPE '\\' OR sender LIKE ? ESCAPE '\\')".to_string());
                let pattern = format!("%{}%", escape_like(term));
                params.push(pattern.clone());
                params.push(pattern);
            }
        }

        Self { clauses, params }
    }

    fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

/// Escape LIKE wildcards so terms match literally
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn query_failed(query: &str, e: &rusqlite::Error) -> IndexError {
    IndexError::QueryFailed {
        query: query.to_string(),
        reason: e.to_string(),
    }
}

fn corrupt(e: rusqlite::Error) -> IndexError {
    IndexError::Corrupt {
        reason: e.to_string(),
    }
}

fn fetch_message(conn: &Connection, id: String) -> IndexResult<IndexedMessage> {
    let mut stmt = conn
        .prepare_cached("SELECT path FROM filenames WHERE message_id = ?1 ORDER BY path")
        .map_err(corrupt)?;
    let rows = stmt
        .query_map([&id], |row| row.get::<_, String>(0))
        .map_err(corrupt)?;

    let mut filenames = Vec::new();
    for row in rows {
        filenames.push(PathBuf::from(row.map_err(corrupt)?));
    }
    Ok(IndexedMessage { id, filenames })
}

fn fetch_thread(conn: &Connection, id: String) -> IndexResult<IndexedThread> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT message_id FROM messages \
             WHERE thread_id = ?1 AND in_reply_to IS NULL ORDER BY date, id",
        )
        .map_err(corrupt)?;
    let rows = stmt
        .query_map([&id], |row| row.get::<_, String>(0))
        .map_err(corrupt)?;

    let mut top_level = Vec::new();
    for row in rows {
        top_level.push(fetch_message(conn, row.map_err(corrupt)?)?);
    }
    Ok(IndexedThread { id, top_level })
}

/// Streams messages one by one, loading filenames on demand
struct MessageRows<'a> {
    conn: &'a Connection,
    ids: std::vec::IntoIter<String>,
}

impl Iterator for MessageRows<'_> {
    type Item = IndexResult<IndexedMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.ids.next()?;
        Some(fetch_message(self.conn, id))
    }
}

/// Streams threads one by one, assembling top-level messages on demand
struct ThreadRows<'a> {
    conn: &'a Connection,
    ids: std::vec::IntoIter<String>,
}

impl Iterator for ThreadRows<'_> {
    type Item = IndexResult<IndexedThread>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.ids.next()?;
        Some(fetch_thread(self.conn, id))
    }
}
