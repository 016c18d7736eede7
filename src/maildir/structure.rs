//! Maildir structure verification and creation
//!
//! A maildir root holds three subdirectories: `new`, `cur` and `tmp`.
//! Before anything is projected the target must either already provide all
//! three with read/write/execute access, or be created on demand with a
//! caller-supplied permission mode.

use crate::error::{MaildirError, MaildirResult};
use std::ffi::CString;
use std::fs::{self, DirBuilder};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

/// The standard maildir subdirectories, in check/creation order
const MAILDIR_SUBDIRS: [&str; 3] = ["new", "cur", "tmp"];

/// Verify or create the standard maildir layout under `maildir`.
///
/// With `create_missing` unset, each subdirectory must already exist, be a
/// directory and be readable, writable and executable by this process.
/// With `create_missing` set, missing subdirectories and their parents are
/// created with permission `mode`; directories that already exist are left
/// alone.
///
/// Fails on the first problem. Subdirectories created before the failure
/// are not rolled back.
pub fn ensure_structure(maildir: &Path, create_missing: bool, mode: u32) -> MaildirResult<()> {
    for sub in MAILDIR_SUBDIRS {
        let path = maildir.join(sub);
        if create_missing {
            DirBuilder::new()
                .recursive(true)
                .mode(mode)
                .create(&path)
                .map_err(|e| MaildirError::CreateFailed {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
        } else {
            check_accessible_dir(&path)?;
        }
    }
    Ok(())
}

/// Check that `path` is a directory this process can read, write and
/// search. The access check uses the real filesystem permission test
/// rather than inferring from mode bits.
fn check_accessible_dir(path: &Path) -> MaildirResult<()> {
    let c_path =
        CString::new(path.as_os_str().as_bytes()).map_err(|_| MaildirError::Inaccessible {
            path: path.to_path_buf(),
            reason: "path contains an interior NUL byte".into(),
        })?;

    // SAFETY: c_path is a valid NUL-terminated string for the duration of
    // the call.
    let accessible =
        unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::W_OK | libc::X_OK) == 0 };
    if !accessible {
        return Err(MaildirError::Inaccessible {
            path: path.to_path_buf(),
            reason: std::io::Error::last_os_error().to_string(),
        });
    }

    let meta = fs::symlink_metadata(path).map_err(|e| MaildirError::Inaccessible {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if !meta.is_dir() {
        return Err(MaildirError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
