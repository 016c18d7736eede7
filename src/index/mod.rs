//! Mail index access
//!
//! The linker consumes search results through the narrow surface defined
//! here and never looks inside the index: which messages match a query,
//! how threads are assembled and what order results arrive in are all the
//! index's business. Two adapters implement the contract:
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                 MailIndex (trait)                │
//! │   search_messages  - flat stream of matches      │
//! │   search_threads   - stream of matched threads   │
//! └──────────────────────────────────────────────────┘
//!            │                          │
//!            ▼                          ▼
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │     SqliteIndex      │   │     MemoryIndex      │
//! │ read-only index file │   │ canned records, used │
//! │ opened by the CLI    │   │ by tests / embedders │
//! └──────────────────────┘   └──────────────────────┘
//! ```
//!
//! Result streams are finite and single-pass. Dropping a stream releases
//! whatever the adapter holds for it; nothing needs explicit teardown.

pub mod memory;
pub mod schema;
pub mod sqlite;

use crate::error::IndexResult;
use std::path::PathBuf;

pub use memory::{MemoryIndex, MemoryMessage};
pub use sqlite::SqliteIndex;

/// A message matched by a query.
///
/// The identifier is carried for diagnostics; linking only consumes the
/// filenames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedMessage {
    /// Stable message identifier
    pub id: String,

    /// Every file holding a copy of this message
    pub filenames: Vec<PathBuf>,
}

/// A thread with at least one matching message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedThread {
    /// Stable thread identifier
    pub id: String,

    /// Top-level messages of the whole thread (no parent inside the
    /// thread), in index order. Never legitimately empty.
    pub top_level: Vec<IndexedMessage>,
}

/// Single-pass stream of matched messages
pub type MessageStream<'a> = Box<dyn Iterator<Item = IndexResult<IndexedMessage>> + 'a>;

/// Single-pass stream of matched threads
pub type ThreadStream<'a> = Box<dyn Iterator<Item = IndexResult<IndexedThread>> + 'a>;

/// Read-only search surface of a mail index
pub trait MailIndex {
    /// All messages matching `query`, flat, in index order
    fn search_messages<'a>(&'a self, query: &str) -> IndexResult<MessageStream<'a>>;

    /// All threads containing at least one match, in index order
    fn search_threads<'a>(&'a self, query: &str) -> IndexResult<ThreadStream<'a>>;
}

/// An index handle bound to one query string.
///
/// Obtain each stream at most once per run; streams are single-pass and a
/// second request re-executes the search.
pub struct Query<'idx> {
    index: &'idx dyn MailIndex,
    terms: String,
}

impl<'idx> Query<'idx> {
    pub fn new(index: &'idx dyn MailIndex, terms: impl Into<String>) -> Self {
        Self {
            index,
            terms: terms.into(),
        }
    }

    /// The query string this handle was created with
    pub fn terms(&self) -> &str {
        &self.terms
    }

    /// Stream of matching messages
    pub fn messages(&self) -> IndexResult<MessageStream<'idx>> {
        self.index.search_messages(&self.terms)
    }

    /// Stream of matching threads
    pub fn threads(&self) -> IndexResult<ThreadStream<'idx>> {
        self.index.search_threads(&self.terms)
    }
}
