//! Recursive maildir tree cleaning
//!
//! Walks the target tree and deletes entries matching the configured
//! [`CleanMethod`], counting what it removes. Entries named `tmp` are
//! skipped at every depth: messages in transit must survive every policy.

use crate::error::{MaildirError, MaildirResult};
use crate::maildir::types::{CleanMethod, EntryKind};
use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::DirEntryExt;
use std::path::Path;
use tracing::{debug, warn};

/// Recursively delete entries under `path` according to `method`.
///
/// Returns the number of entries removed at this level and below.
/// Directories are recursed into but never removed themselves, and entries
/// are visited in ascending inode order so repeat runs over the same
/// filesystem state behave identically.
///
/// Failure to open `path` itself is fatal for this call. A subdirectory
/// that cannot be opened is logged and skipped, and a failed unlink is
/// logged, left uncounted and does not stop the pass.
pub fn clean_tree(path: &Path, method: CleanMethod) -> MaildirResult<u64> {
    if method == CleanMethod::None {
        return Ok(0);
    }

    let mut entries = Vec::new();
    let listing = fs::read_dir(path).map_err(|e| MaildirError::ReadDirFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    for entry in listing {
        let entry = entry.map_err(|e| MaildirError::ReadDirFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        entries.push(entry);
    }

    // Directory listing order is filesystem-dependent; inode order is not.
    entries.sort_by_key(|entry| entry.ino());

    let mut removed = 0u64;
    for entry in entries {
        if entry.file_name() == "tmp" {
            continue;
        }

        let full = entry.path();
        let mut delete = false;
        match EntryKind::resolve(&entry) {
            EntryKind::File => {
                delete = method == CleanMethod::All;
            }
            EntryKind::Symlink => {
                delete = match method {
                    CleanMethod::All | CleanMethod::Symlink => true,
                    CleanMethod::Dangling => is_dangling(&full),
                    CleanMethod::None => false,
                };
            }
            EntryKind::Directory => match clean_tree(&full, method) {
                Ok(count) => removed += count,
                Err(e) => warn!("skipping subdirectory: {}", e),
            },
            EntryKind::Unknown => {}
        }

        if delete {
            match fs::remove_file(&full) {
                Ok(()) => {
                    debug!("unlinked '{}'", full.display());
                    removed += 1;
                }
                Err(e) => warn!("error unlinking '{}': {}", full.display(), e),
            }
        }
    }

    Ok(removed)
}

/// A symlink is dangling when following it fails with "not found" or "too
/// many levels of symbolic links". Any other failure to resolve the target
/// (permission denied among them) leaves the link in place.
fn is_dangling(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(_) => false,
        // ErrorKind::FilesystemLoop is still unstable (io_error_more);
        // match its underlying ELOOP errno instead.
        Err(e) => e.kind() == ErrorKind::NotFound || e.raw_os_error() == Some(libc::ELOOP),
    }
}
