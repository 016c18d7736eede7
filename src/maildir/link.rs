//! Message projection into a target maildir
//!
//! The source's `cur`/`new` placement is preserved on the target side, so
//! a message already marked seen stays seen. Files under `tmp`, or under
//! any directory that is not a maildir subfolder, are rejected before any
//! link is attempted.

use crate::error::{MaildirError, MaildirResult};
use crate::maildir::types::{LinkOutcome, RenameMethod, Subdir};
use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

/// Classify which maildir subfolder `src` lives in from its parent
/// directory component.
///
/// The parent must be a component named exactly `new` or `cur`; anything
/// else, `tmp` included, is `InvalidSubdirectory`.
pub fn subdir_of(src: &Path) -> MaildirResult<Subdir> {
    let parent = src
        .parent()
        .and_then(|p| p.file_name())
        .ok_or_else(|| MaildirError::InvalidSubdirectory {
            path: src.to_path_buf(),
        })?;

    if parent == "new" {
        Ok(Subdir::New)
    } else if parent == "cur" {
        Ok(Subdir::Cur)
    } else {
        Err(MaildirError::InvalidSubdirectory {
            path: src.to_path_buf(),
        })
    }
}

/// Compute the destination for `src` inside `maildir`: the same filename
/// under the same subfolder.
pub fn transform_path(src: &Path, maildir: &Path) -> MaildirResult<PathBuf> {
    let subdir = subdir_of(src)?;
    let name = src
        .file_name()
        .ok_or_else(|| MaildirError::InvalidSubdirectory {
            path: src.to_path_buf(),
        })?;
    Ok(maildir.join(subdir.as_str()).join(name))
}

/// Project `src` into `maildir` using `method`.
///
/// An already-present destination reports [`LinkOutcome::Existing`] rather
/// than an error, so re-running the same projection is harmless.
pub fn link_message(
    src: &Path,
    maildir: &Path,
    method: RenameMethod,
) -> MaildirResult<LinkOutcome> {
    let dest = transform_path(src, maildir)?;

    let result = match method {
        RenameMethod::Symlink => symlink(src, &dest),
        RenameMethod::Hardlink => fs::hard_link(src, &dest),
    };

    match result {
        Ok(()) => Ok(LinkOutcome::Created),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(LinkOutcome::Existing),
        Err(e) => Err(MaildirError::LinkFailed {
            src: src.to_path_buf(),
            dest,
            reason: e.to_string(),
        }),
    }
}
