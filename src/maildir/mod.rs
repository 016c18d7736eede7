//! Maildir filesystem operations
//!
//! Everything that touches the target maildir lives here: verifying or
//! creating the standard layout, policy-driven cleaning of stale entries,
//! and projecting source message files as symlinks or hardlinks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 target maildir root                 │
//! │   new/  - unseen messages, linked from source new/  │
//! │   cur/  - seen messages, linked from source cur/    │
//! │   tmp/  - delivery staging, never cleaned or linked │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use maildir_link::maildir::{clean_tree, ensure_structure, link_message};
//! use maildir_link::maildir::{CleanMethod, RenameMethod};
//! use std::path::Path;
//!
//! let target = Path::new("/home/user/mail/review");
//!
//! // Create the layout on first use, then drop stale symlinks
//! ensure_structure(target, true, 0o700).unwrap();
//! let removed = clean_tree(target, CleanMethod::Dangling).unwrap();
//! println!("removed {removed} stale entries");
//!
//! // Project one message file, preserving its cur/new placement
//! let source = Path::new("/home/user/mail/inbox/cur/1234.msg");
//! link_message(source, target, RenameMethod::Symlink).unwrap();
//! ```

pub mod clean;
pub mod link;
pub mod structure;
pub mod types;

pub use clean::clean_tree;
pub use link::{link_message, subdir_of, transform_path};
pub use structure::ensure_structure;
pub use types::{CleanMethod, EntryKind, LinkOutcome, RenameMethod, Subdir};
