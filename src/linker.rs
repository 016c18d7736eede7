//! Link orchestration
//!
//! Drives one projection run end to end: prepare the target maildir
//! (structure check or creation, then cleaning), select messages from the
//! query (flat or per-thread), link every file of every selected message
//! and accumulate counts. Failures scoped to a single source file are
//! logged and skipped; failures that compromise the target tree or break
//! the index's own contract abort the run.

use crate::config::LinkOptions;
use crate::error::{IndexError, LinkError, Result};
use crate::index::{IndexedMessage, Query};
use crate::maildir::{self, LinkOutcome};
use tracing::{debug, warn};

/// Counts accumulated over a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSummary {
    /// Entries removed by the cleaning pass
    pub cleaned: u64,

    /// Newly created links, one per source filename
    pub linked: u64,

    /// Threads processed; `None` outside entire-thread mode
    pub threads: Option<u64>,
}

/// Coordinates one projection run
pub struct LinkCoordinator {
    options: LinkOptions,
}

impl LinkCoordinator {
    pub fn new(options: LinkOptions) -> Self {
        Self { options }
    }

    /// Run prepare, select and link for `query`, returning the counts.
    pub fn run(&self, query: &Query<'_>) -> Result<LinkSummary> {
        let cleaned = self.prepare()?;

        let mut summary = LinkSummary {
            cleaned,
            ..LinkSummary::default()
        };

        if self.options.entire_thread {
            let (threads, linked) = self.link_threads(query)?;
            summary.threads = Some(threads);
            summary.linked = linked;
        } else {
            summary.linked = self.link_messages(query)?;
        }

        Ok(summary)
    }

    /// Verify or create the maildir layout, then apply the cleaning policy.
    fn prepare(&self) -> Result<u64> {
        let options = &self.options;
        maildir::ensure_structure(&options.maildir, options.create_missing, options.mode)?;

        let cleaned = maildir::clean_tree(&options.maildir, options.clean_method)?;
        if cleaned > 0 {
            debug!("removed {} entries under '{}'", cleaned, options.maildir.display());
        }
        Ok(cleaned)
    }

    /// Link every file of every matched message.
    fn link_messages(&self, query: &Query<'_>) -> Result<u64> {
        let mut linked = 0;
        for message in query.messages()? {
            linked += self.link_message_files(&message?)?;
        }
        Ok(linked)
    }

    /// Link every file of every top-level message of every matched thread.
    fn link_threads(&self, query: &Query<'_>) -> Result<(u64, u64)> {
        let mut threads = 0;
        let mut linked = 0;

        for thread in query.threads()? {
            let thread = thread?;
            if thread.top_level.is_empty() {
                // Every thread owes us at least one top-level message; an
                // empty one means the index contradicts itself.
                return Err(LinkError::Index(IndexError::EmptyThread {
                    thread_id: thread.id,
                }));
            }

            threads += 1;
            for message in &thread.top_level {
                linked += self.link_message_files(message)?;
            }
        }

        Ok((threads, linked))
    }

    /// Link each file of one message, counting newly created links.
    /// Per-file failures are logged and skipped.
    fn link_message_files(&self, message: &IndexedMessage) -> Result<u64> {
        let mut linked = 0;
        for path in &message.filenames {
            match maildir::link_message(path, &self.options.maildir, self.options.rename_method) {
                Ok(LinkOutcome::Created) => linked += 1,
                Ok(LinkOutcome::Existing) => {
                    debug!("already linked: '{}'", path.display());
                }
                Err(e) if e.is_recoverable() => {
                    warn!(message_id = %message.id, "{}", e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(linked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::memory::{MemoryIndex, MemoryMessage};
    use crate::maildir::{ensure_structure, CleanMethod, RenameMethod};
    use std::fs;
    use std::os::unix::fs::{symlink, MetadataExt};
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn options(maildir: &Path) -> LinkOptions {
        LinkOptions {
            maildir: maildir.to_path_buf(),
            create_missing: true,
            mode: 0o700,
            entire_thread: false,
            clean_method: CleanMethod::None,
            rename_method: RenameMethod::Symlink,
        }
    }

    fn message(id: &str, thread_id: &str, subject: &str, files: &[PathBuf]) -> MemoryMessage {
        MemoryMessage {
            id: id.into(),
            thread_id: thread_id.into(),
            subject: subject.into(),
            sender: "sender@example.com".into(),
            date: 100,
            in_reply_to: None,
            filenames: files.to_vec(),
        }
    }

    fn source_file(root: &Path, sub: &str, name: &str) -> PathBuf {
        let dir = root.join(sub);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, b"Subject: test\n\nbody\n").unwrap();
        path
    }

    #[test]
    fn test_flat_run_links_each_filename() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");

        let mut index = MemoryIndex::new();
        index.push(message("m1", "t1", "alpha", &[source_file(&source, "cur", "m1")]));
        index.push(message("m2", "t2", "alpha", &[source_file(&source, "new", "m2")]));

        let query = Query::new(&index, "alpha");
        let summary = LinkCoordinator::new(options(&target)).run(&query).unwrap();

        assert_eq!(summary.linked, 2);
        assert_eq!(summary.cleaned, 0);
        assert_eq!(summary.threads, None);
        assert!(target.join("cur/m1").symlink_metadata().is_ok());
        assert!(target.join("new/m2").symlink_metadata().is_ok());
    }

    #[test]
    fn test_rerun_creates_nothing_new() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");

        let mut index = MemoryIndex::new();
        index.push(message("m1", "t1", "alpha", &[source_file(&source, "cur", "m1")]));

        let coordinator = LinkCoordinator::new(options(&target));
        let query = Query::new(&index, "alpha");

        assert_eq!(coordinator.run(&query).unwrap().linked, 1);
        assert_eq!(coordinator.run(&query).unwrap().linked, 0);
        assert_eq!(fs::read_dir(target.join("cur")).unwrap().count(), 1);
    }

    #[test]
    fn test_thread_run_counts_messages_and_threads() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");

        // One thread, two top-level messages, three files in total
        let mut index = MemoryIndex::new();
        index.push(message(
            "m1",
            "t1",
            "alpha",
            &[
                source_file(&source, "cur", "m1a"),
                source_file(&source, "cur", "m1b"),
            ],
        ));
        index.push(message("m2", "t1", "beta", &[source_file(&source, "new", "m2")]));

        let mut opts = options(&target);
        opts.entire_thread = true;
        let query = Query::new(&index, "alpha");
        let summary = LinkCoordinator::new(opts).run(&query).unwrap();

        assert_eq!(summary.threads, Some(1));
        assert_eq!(summary.linked, 3);
    }

    #[test]
    fn test_empty_thread_aborts_the_run() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("target");

        let mut index = MemoryIndex::new();
        let mut reply = message("m2", "t1", "alpha", &[]);
        reply.in_reply_to = Some("m1".into());
        index.push(reply);

        let mut opts = options(&target);
        opts.entire_thread = true;
        let query = Query::new(&index, "alpha");
        let err = LinkCoordinator::new(opts).run(&query).unwrap_err();

        assert!(matches!(
            err,
            LinkError::Index(IndexError::EmptyThread { .. })
        ));
    }

    #[test]
    fn test_prepare_failure_stops_before_linking() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");

        let mut index = MemoryIndex::new();
        index.push(message("m1", "t1", "alpha", &[source_file(&source, "cur", "m1")]));

        let mut opts = options(&target);
        opts.create_missing = false;
        let query = Query::new(&index, "alpha");
        let err = LinkCoordinator::new(opts).run(&query).unwrap_err();

        assert!(matches!(err, LinkError::Maildir(_)));
        assert!(!target.exists());
    }

    #[test]
    fn test_files_outside_new_and_cur_are_skipped() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");

        let mut index = MemoryIndex::new();
        index.push(message(
            "m1",
            "t1",
            "alpha",
            &[
                source_file(&source, "tmp", "m1"),
                source_file(&source, "cur", "m1"),
            ],
        ));

        let query = Query::new(&index, "alpha");
        let summary = LinkCoordinator::new(options(&target)).run(&query).unwrap();

        assert_eq!(summary.linked, 1);
        assert!(target.join("cur/m1").symlink_metadata().is_ok());
        assert!(target.join("tmp/m1").symlink_metadata().is_err());
    }

    #[test]
    fn test_cleaning_runs_before_linking() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");
        ensure_structure(&target, true, 0o700).unwrap();
        symlink(target.join("cur/gone"), target.join("cur/stale")).unwrap();

        let mut index = MemoryIndex::new();
        index.push(message("m1", "t1", "alpha", &[source_file(&source, "cur", "m1")]));

        let mut opts = options(&target);
        opts.clean_method = CleanMethod::Dangling;
        let query = Query::new(&index, "alpha");
        let summary = LinkCoordinator::new(opts).run(&query).unwrap();

        assert_eq!(summary.cleaned, 1);
        assert_eq!(summary.linked, 1);
        assert!(target.join("cur/stale").symlink_metadata().is_err());
    }

    #[test]
    fn test_hardlink_run_shares_inodes() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");

        let mut index = MemoryIndex::new();
        index.push(message("m1", "t1", "alpha", &[source_file(&source, "cur", "m1")]));

        let mut opts = options(&target);
        opts.rename_method = RenameMethod::Hardlink;
        let query = Query::new(&index, "alpha");
        let summary = LinkCoordinator::new(opts).run(&query).unwrap();

        assert_eq!(summary.linked, 1);
        assert_eq!(fs::metadata(target.join("cur/m1")).unwrap().nlink(), 2);
    }

    #[test]
    fn test_broken_sources_do_not_stop_the_run() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("source");
        let target = dir.path().join("target");

        let mut index = MemoryIndex::new();
        index.push(message("m1", "t1", "alpha", &[PathBuf::from("/no/such/cur/m1")]));
        index.push(message("m2", "t2", "alpha", &[source_file(&source, "cur", "m2")]));

        let mut opts = options(&target);
        opts.rename_method = RenameMethod::Hardlink;
        let query = Query::new(&index, "alpha");
        let summary = LinkCoordinator::new(opts).run(&query).unwrap();

        assert_eq!(summary.linked, 1);
        assert!(target.join("cur/m2").exists());
    }
}
