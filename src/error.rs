//! Error types for maildir-link
//!
//! This module defines a structured error hierarchy that covers:
//! - Maildir filesystem errors (structure, cleaning, linking)
//! - Mail index errors (opening, querying, malformed data)
//! - Configuration and CLI errors
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include the path and the OS reason
//! - Recoverable errors are skipped with a warning, the rest abort the run

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the maildir-link application
#[derive(Error, Debug)]
pub enum LinkError {
    /// Maildir filesystem errors
    #[error("Maildir error: {0}")]
    Maildir(#[from] MaildirError),

    /// Mail index errors
    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Maildir filesystem errors
#[derive(Error, Debug, Clone)]
pub enum MaildirError {
    /// Target exists but is not a directory
    #[error("Path '{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    /// Target is missing or lacks read/write/execute access
    #[error("Cannot access '{path}': {reason}")]
    Inaccessible { path: PathBuf, reason: String },

    /// Directory creation failed
    #[error("Error creating '{path}': {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// Directory listing failed
    #[error("Error opening directory '{path}': {reason}")]
    ReadDirFailed { path: PathBuf, reason: String },

    /// Source file is not inside a `new` or `cur` subdirectory
    #[error("'{path}' is not inside a maildir 'new' or 'cur' directory")]
    InvalidSubdirectory { path: PathBuf },

    /// Link creation failed
    #[error("Error linking '{src}' to '{dest}': {reason}")]
    LinkFailed {
        src: PathBuf,
        dest: PathBuf,
        reason: String,
    },
}

impl MaildirError {
    /// Check if this error is scoped to a single source file (skip and
    /// continue) rather than to the target maildir as a whole (abort).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MaildirError::InvalidSubdirectory { .. } | MaildirError::LinkFailed { .. }
        )
    }
}

/// Mail index errors
#[derive(Error, Debug, Clone)]
pub enum IndexError {
    /// Failed to open the index database
    #[error("Failed to open index '{path}': {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    /// Search execution failed
    #[error("Query '{query}' failed: {reason}")]
    QueryFailed { query: String, reason: String },

    /// Index returned data that violates its own schema
    #[error("Malformed index data: {reason}")]
    Corrupt { reason: String },

    /// A thread was returned with no top-level messages
    #[error("Thread {thread_id} has no top-level messages")]
    EmptyThread { thread_id: String },
}

/// Configuration and CLI errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// Unknown --rename method
    #[error("Invalid rename method '{value}'")]
    InvalidRename { value: String },

    /// Recognized --rename method without an implementation
    #[error("Rename method '{value}' is not yet supported")]
    UnsupportedRename { value: String },

    /// Unknown --clean method
    #[error("Invalid clean method '{value}'")]
    InvalidClean { value: String },

    /// --mkdir mode is not a valid octal permission value
    #[error("Invalid directory mode '{value}': expected octal permissions, e.g. 0700")]
    InvalidMode { value: String },

    /// No search terms given
    #[error("At least one search term is required")]
    MissingQuery,
}

/// Result type alias for LinkError
pub type Result<T> = std::result::Result<T, LinkError>;

/// Result type alias for MaildirError
pub type MaildirResult<T> = std::result::Result<T, MaildirError>;

/// Result type alias for IndexError
pub type IndexResult<T> = std::result::Result<T, IndexError>;
