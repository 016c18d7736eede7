//! Maildir entry types and projection policies
//!
//! These types describe filesystem entries seen while cleaning a maildir
//! tree and the policies that drive cleaning and linking.

use std::fs;
use std::os::unix::fs::MetadataExt;
use tracing::warn;

/// Type of filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
    /// Anything else (devices, pipes, sockets) or unclassifiable
    Unknown,
}

impl EntryKind {
    /// Convert from mode bits
    pub fn from_mode(mode: u32) -> Self {
        match mode & 0o170000 {
            0o100000 => EntryKind::File,      // S_IFREG
            0o040000 => EntryKind::Directory, // S_IFDIR
            0o120000 => EntryKind::Symlink,   // S_IFLNK
            _ => EntryKind::Unknown,
        }
    }

    /// Convert from a std file type
    pub fn from_file_type(file_type: fs::FileType) -> Self {
        if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Unknown
        }
    }

    /// Effective type of a directory entry.
    ///
    /// Uses the type the directory listing reported when available,
    /// otherwise falls back to an lstat probe of the full path. A failed
    /// probe is logged and classified `Unknown` so callers skip the entry.
    pub fn resolve(entry: &fs::DirEntry) -> Self {
        match entry.file_type() {
            Ok(file_type) => Self::from_file_type(file_type),
            Err(_) => {
                let path = entry.path();
                match fs::symlink_metadata(&path) {
                    Ok(meta) => Self::from_mode(meta.mode()),
                    Err(e) => {
                        warn!("error reading type of '{}': {}", path.display(), e);
                        EntryKind::Unknown
                    }
                }
            }
        }
    }

    /// Check if this is a regular file
    pub fn is_file(&self) -> bool {
        *self == EntryKind::File
    }

    /// Check if this is a directory
    pub fn is_dir(&self) -> bool {
        *self == EntryKind::Directory
    }

    /// Check if this is a symbolic link
    pub fn is_symlink(&self) -> bool {
        *self == EntryKind::Symlink
    }
}

/// Maildir subdirectory a message file can be linked from or into.
///
/// `tmp` is deliberately absent: its contents are messages still being
/// delivered and are never projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subdir {
    /// Unseen messages
    New,
    /// Seen messages
    Cur,
}

impl Subdir {
    /// Directory name on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            Subdir::New => "new",
            Subdir::Cur => "cur",
        }
    }
}

/// Strategy used to project a source message file into the target maildir.
///
/// `copy` and `move` are recognized on the command line but rejected during
/// configuration until an implementation exists, so this set stays closed
/// over what the linker can actually do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameMethod {
    /// Create a symbolic link pointing at the source file
    Symlink,
    /// Create a hard link sharing the source inode
    Hardlink,
}

impl RenameMethod {
    /// Past-tense verb used in summary lines
    pub fn verb(&self) -> &'static str {
        match self {
            RenameMethod::Symlink => "symlinked",
            RenameMethod::Hardlink => "hardlinked",
        }
    }
}

/// Policy selecting which entries the tree cleaner removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanMethod {
    /// Remove only symlinks whose target no longer resolves
    Dangling,
    /// Remove every symlink regardless of validity
    Symlink,
    /// Remove every regular file and every symlink
    All,
    /// Leave the tree untouched
    #[default]
    None,
}

/// Non-error result of a single link attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new link was created at the destination
    Created,
    /// The destination already existed; nothing was done
    Existing,
}
