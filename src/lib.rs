//! maildir-link - Maildir projection of mail-index search results
//!
//! A tool that searches a read-only mail index and materializes every
//! matched message inside a target maildir as a symlink or hardlink,
//! preserving each source file's `cur`/`new` subfolder. The target tree
//! can first be cleaned of stale entries, with policies ranging from
//! "only dangling symlinks" to "everything linkable".
//!
//! # Features
//!
//! - **Index-agnostic core**: the linker consumes search results through
//!   the [`index::MailIndex`] trait; a read-only SQLite adapter serves the
//!   CLI and an in-memory adapter serves tests and embedders.
//!
//! - **Faithful maildir handling**: the `cur`/`new` distinction survives
//!   projection, `tmp` is never linked from or cleaned, and the standard
//!   layout is verified (or created on request) before anything runs.
//!
//! - **Safe re-runs**: existing links are left alone and uncounted, so
//!   the same projection can be repeated to pick up new matches.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  search   ┌──────────────────────────────┐
//! │    mail index    │──────────▶│       LinkCoordinator        │
//! │   (read-only)    │  streams  │   prepare ─ select ─ link    │
//! └──────────────────┘           └──────────────┬───────────────┘
//!                                               │
//!                      ┌────────────────────────┼───────────────────┐
//!                      ▼                        ▼                   ▼
//!              ensure_structure             clean_tree         link_message
//!              (new/cur/tmp)             (policy deletes)   (symlink/hardlink)
//!                      │                        │                   │
//!                      └────────────────────────┴───────────────────┘
//!                                               │
//!                                               ▼
//!                                   ┌──────────────────────┐
//!                                   │  target maildir tree │
//!                                   └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use maildir_link::config::LinkOptions;
//! use maildir_link::index::{MemoryIndex, Query};
//! use maildir_link::linker::LinkCoordinator;
//! use maildir_link::maildir::{CleanMethod, RenameMethod};
//!
//! let index = MemoryIndex::new();
//! let query = Query::new(&index, "from-the-mailing-list");
//!
//! let options = LinkOptions {
//!     maildir: "/home/user/mail/review".into(),
//!     create_missing: true,
//!     mode: 0o700,
//!     entire_thread: false,
//!     clean_method: CleanMethod::Dangling,
//!     rename_method: RenameMethod::Symlink,
//! };
//!
//! let summary = LinkCoordinator::new(options).run(&query).unwrap();
//! println!("{} new links", summary.linked);
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod linker;
pub mod maildir;
pub mod report;

pub use config::{CliArgs, LinkConfig, LinkOptions};
pub use error::{LinkError, Result};
pub use linker::{LinkCoordinator, LinkSummary};
