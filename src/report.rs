//! User-facing summary output
//!
//! Summary lines go to stdout; everything diagnostic goes through
//! `tracing` to stderr. A count of zero suppresses its line, so a run
//! that did nothing stays silent.

use crate::config::LinkOptions;
use crate::linker::LinkSummary;
use console::style;
use std::path::Path;

/// Print the post-run summary lines for a completed projection.
pub fn print_summary(summary: &LinkSummary, options: &LinkOptions) {
    if summary.cleaned > 0 {
        println!("{}", clean_line(summary.cleaned, &options.maildir));
    }
    if summary.linked > 0 {
        println!("{}", link_line(summary, options));
    }
}

/// `Unlinked N entries under PATH`
fn clean_line(cleaned: u64, maildir: &Path) -> String {
    format!(
        "Unlinked {} entries under {}",
        style(cleaned).bold(),
        maildir.display()
    )
}

/// `N messages VERB under PATH`, with a thread count in entire-thread mode
fn link_line(summary: &LinkSummary, options: &LinkOptions) -> String {
    let verb = options.rename_method.verb();
    match summary.threads {
        Some(threads) => format!(
            "{} messages in {} threads {} under {}",
            style(summary.linked).bold(),
            style(threads).bold(),
            verb,
            options.maildir.display()
        ),
        None => format!(
            "{} messages {} under {}",
            style(summary.linked).bold(),
            verb,
            options.maildir.display()
        ),
    }
}
