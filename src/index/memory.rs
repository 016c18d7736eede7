//! In-memory index adapter
//!
//! Serves canned records for tests and for embedders that already hold
//! their search results. Matching semantics mirror the SQLite adapter:
//! whitespace-separated terms AND-match as case-insensitive substrings of
//! subject and sender, with `id:` and `thread:` exact-match prefixes, and
//! results come back in date order.

use crate::error::IndexResult;
use crate::index::{IndexedMessage, IndexedThread, MailIndex, MessageStream, ThreadStream};
use std::path::PathBuf;

/// One canned message record
#[derive(Debug, Clone)]
pub struct MemoryMessage {
    /// Stable message identifier
    pub id: String,

    /// Thread this message belongs to
    pub thread_id: String,

    /// Subject line, matched by bare query terms
    pub subject: String,

    /// Sender address, matched by bare query terms
    pub sender: String,

    /// Unix timestamp used as the result sort key
    pub date: i64,

    /// Parent message id; `None` marks a top-level message
    pub in_reply_to: Option<String>,

    /// Every file holding a copy of this message
    pub filenames: Vec<PathBuf>,
}

/// Index over a vector of records
#[derive(Debug, Default)]
pub struct MemoryIndex {
    messages: Vec<MemoryMessage>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record
    pub fn push(&mut self, message: MemoryMessage) {
        self.messages.push(message);
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn matching(&self, query: &str) -> Vec<&MemoryMessage> {
        let mut hits: Vec<&MemoryMessage> = self
            .messages
            .iter()
            .filter(|m| query.split_whitespace().all(|term| term_matches(m, term)))
            .collect();
        hits.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        hits
    }
}

fn term_matches(message: &MemoryMessage, term: &str) -> bool {
    if let Some(id) = term.strip_prefix("id:") {
        message.id == id
    } else if let Some(thread) = term.strip_prefix("thread:") {
        message.thread_id == thread
    } else {
        let needle = term.to_lowercase();
        message.subject.to_lowercase().contains(&needle)
            || message.sender.to_lowercase().contains(&needle)
    }
}

fn to_indexed(message: &MemoryMessage) -> IndexedMessage {
    IndexedMessage {
        id: message.id.clone(),
        filenames: message.filenames.clone(),
    }
}

impl MailIndex for MemoryIndex {
    fn search_messages<'a>(&'a self, query: &str) -> IndexResult<MessageStream<'a>> {
        let hits: Vec<IndexedMessage> = self.matching(query).into_iter().map(to_indexed).collect();
        Ok(Box::new(hits.into_iter().map(Ok)))
    }

    fn search_threads<'a>(&'a self, query: &str) -> IndexResult<ThreadStream<'a>> {
        // Thread order follows the earliest matching message
        let mut thread_ids: Vec<&str> = Vec::new();
        for hit in self.matching(query) {
            if !thread_ids.contains(&hit.thread_id.as_str()) {
                thread_ids.push(&hit.thread_id);
            }
        }

        let threads: Vec<IndexedThread> = thread_ids
            .into_iter()
            .map(|thread_id| {
                let mut top_level: Vec<&MemoryMessage> = self
                    .messages
                    .iter()
                    .filter(|m| m.thread_id == thread_id && m.in_reply_to.is_none())
                    .collect();
                top_level.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
                IndexedThread {
                    id: thread_id.to_string(),
                    top_level: top_level.into_iter().map(to_indexed).collect(),
                }
            })
            .collect();

        Ok(Box::new(threads.into_iter().map(Ok)))
    }
}
