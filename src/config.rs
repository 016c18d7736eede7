//! Configuration types for maildir-link
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - Option-value parsing for rename/clean methods and directory modes

use crate::error::ConfigError;
use crate::maildir::{CleanMethod, RenameMethod};
use clap::Parser;
use std::path::PathBuf;

/// Mode used for --mkdir when no explicit value is given
const DEFAULT_MKDIR_MODE: u32 = 0o700;

/// Highest directory mode --mkdir accepts (permission bits only)
const MAX_MKDIR_MODE: u32 = 0o7777;

/// Project mail-index query results into a maildir
#[derive(Parser, Debug, Clone)]
#[command(
    name = "maildir-link",
    version,
    about = "Project mail-index query results into a maildir",
    long_about = "Searches a read-only mail index and projects every matched message \
                  into a target maildir as symlinks or hardlinks, preserving each \
                  source file's cur/new subfolder.\n\n\
                  The target tree can first be cleaned of stale entries with --clean, \
                  and --entire-thread widens the projection from matched messages to \
                  the threads containing them.",
    after_help = "EXAMPLES:\n    \
        maildir-link --index mail.idx --maildir ~/mail/rust -- rust\n    \
        maildir-link --index mail.idx --maildir /tmp/review --mkdir=0755 --clean=dangling -- patch\n    \
        maildir-link --index mail.idx --maildir ~/mail/releases --rename=hardlink --entire-thread -- release"
)]
pub struct CliArgs {
    /// Mail index database to search (opened read-only)
    #[arg(long, value_name = "PATH")]
    pub index: PathBuf,

    /// Target maildir root
    #[arg(long, value_name = "PATH")]
    pub maildir: PathBuf,

    /// How matched files are projected: symlink or hardlink
    #[arg(long, value_name = "METHOD", default_value = "symlink")]
    pub rename: String,

    /// Cleaning policy applied before linking: dangling, symlink, all or none
    #[arg(long, value_name = "METHOD", default_value = "none")]
    pub clean: String,

    /// Create missing maildir directories, optionally with an octal mode
    #[arg(
        long,
        value_name = "MODE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "0700"
    )]
    pub mkdir: Option<String>,

    /// Project whole threads instead of just the matched messages
    #[arg(long)]
    pub entire_thread: bool,

    /// Verbose output (debug-level diagnostics on stderr)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Search terms, joined into one query string
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    pub query: Vec<String>,
}

/// Immutable options for one projection run
#[derive(Debug, Clone)]
pub struct LinkOptions {
    /// Target maildir root
    pub maildir: PathBuf,

    /// Create missing maildir directories during prepare
    pub create_missing: bool,

    /// Permission mode for created directories
    pub mode: u32,

    /// Project whole threads instead of matched messages only
    pub entire_thread: bool,

    /// Tree-cleaning policy applied before linking
    pub clean_method: CleanMethod,

    /// Link strategy
    pub rename_method: RenameMethod,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Mail index database path
    pub index_path: PathBuf,

    /// Query string (search terms joined with spaces)
    pub query: String,

    /// Projection options
    pub options: LinkOptions,

    /// Verbose logging
    pub verbose: bool,
}

impl LinkConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let rename_method = parse_rename_method(&args.rename)?;
        let clean_method = parse_clean_method(&args.clean)?;

        let (create_missing, mode) = match &args.mkdir {
            Some(raw) => (true, parse_octal_mode(raw)?),
            None => (false, DEFAULT_MKDIR_MODE),
        };

        let query = args.query.join(" ");
        if query.trim().is_empty() {
            return Err(ConfigError::MissingQuery);
        }

        Ok(Self {
            index_path: args.index,
            query,
            verbose: args.verbose,
            options: LinkOptions {
                maildir: args.maildir,
                create_missing,
                mode,
                entire_thread: args.entire_thread,
                clean_method,
                rename_method,
            },
        })
    }
}

/// Parse a --rename value.
///
/// `copy` and `move` are recognized but rejected: the option space is
/// reserved for them without an implementation behind it yet.
pub fn parse_rename_method(value: &str) -> Result<RenameMethod, ConfigError> {
    match value {
        "symlink" => Ok(RenameMethod::Symlink),
        "hardlink" => Ok(RenameMethod::Hardlink),
        "copy" | "move" => Err(ConfigError::UnsupportedRename {
            value: value.to_string(),
        }),
        _ => Err(ConfigError::InvalidRename {
            value: value.to_string(),
        }),
    }
}

/// Parse a --clean value.
pub fn parse_clean_method(value: &str) -> Result<CleanMethod, ConfigError> {
    match value {
        "dangling" => Ok(CleanMethod::Dangling),
        "symlink" => Ok(CleanMethod::Symlink),
        "all" => Ok(CleanMethod::All),
        "none" => Ok(CleanMethod::None),
        _ => Err(ConfigError::InvalidClean {
            value: value.to_string(),
        }),
    }
}

/// Parse an octal --mkdir mode. Only octal digits are accepted, and only
/// permission bits can be set.
pub fn parse_octal_mode(value: &str) -> Result<u32, ConfigError> {
    if value.is_empty() || !value.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return Err(ConfigError::InvalidMode {
            value: value.to_string(),
        });
    }

    let mode = u32::from_str_radix(value, 8).map_err(|_| ConfigError::InvalidMode {
        value: value.to_string(),
    })?;
    if mode > MAX_MKDIR_MODE {
        return Err(ConfigError::InvalidMode {
            value: value.to_string(),
        });
    }
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["maildir-link", "--index", "mail.idx", "--maildir", "/m", "rust"]);
        let config = LinkConfig::from_args(args).unwrap();

        assert_eq!(config.index_path, PathBuf::from("mail.idx"));
        assert_eq!(config.query, "rust");
        assert_eq!(config.options.rename_method, RenameMethod::Symlink);
        assert_eq!(config.options.clean_method, CleanMethod::None);
        assert!(!config.options.create_missing);
        assert_eq!(config.options.mode, 0o700);
        assert!(!config.options.entire_thread);
    }

    #[test]
    fn test_query_terms_are_joined() {
        let args = parse(&[
            "maildir-link", "--index", "i", "--maildir", "m", "rust", "patch", "review",
        ]);
        let config = LinkConfig::from_args(args).unwrap();
        assert_eq!(config.query, "rust patch review");
    }

    #[test]
    fn test_terms_after_double_dash_are_query() {
        let args = parse(&[
            "maildir-link", "--index", "i", "--maildir", "m", "--", "--clean",
        ]);
        let config = LinkConfig::from_args(args).unwrap();
        assert_eq!(config.query, "--clean");
        assert_eq!(config.options.clean_method, CleanMethod::None);
    }

    #[test]
    fn test_query_is_required() {
        assert!(CliArgs::try_parse_from(["maildir-link", "--index", "i", "--maildir", "m"]).is_err());
    }

    #[test]
    fn test_blank_query_rejected() {
        let args = parse(&["maildir-link", "--index", "i", "--maildir", "m", " "]);
        let err = LinkConfig::from_args(args).unwrap_err();
        assert!(matches!(err, ConfigError::MissingQuery));
    }

    #[test]
    fn test_mkdir_without_value_uses_default_mode() {
        let args = parse(&["maildir-link", "--index", "i", "--maildir", "m", "--mkdir", "q"]);
        let config = LinkConfig::from_args(args).unwrap();
        assert!(config.options.create_missing);
        assert_eq!(config.options.mode, 0o700);
    }

    #[test]
    fn test_mkdir_with_explicit_mode() {
        let args = parse(&["maildir-link", "--index", "i", "--maildir", "m", "--mkdir=0755", "q"]);
        let config = LinkConfig::from_args(args).unwrap();
        assert!(config.options.create_missing);
        assert_eq!(config.options.mode, 0o755);
    }

    #[test]
    fn test_rename_methods() {
        assert_eq!(parse_rename_method("symlink").unwrap(), RenameMethod::Symlink);
        assert_eq!(parse_rename_method("hardlink").unwrap(), RenameMethod::Hardlink);
        assert!(matches!(
            parse_rename_method("copy").unwrap_err(),
            ConfigError::UnsupportedRename { .. }
        ));
        assert!(matches!(
            parse_rename_method("move").unwrap_err(),
            ConfigError::UnsupportedRename { .. }
        ));
        assert!(matches!(
            parse_rename_method("teleport").unwrap_err(),
            ConfigError::InvalidRename { .. }
        ));
    }

    #[test]
    fn test_clean_methods() {
        assert_eq!(parse_clean_method("dangling").unwrap(), CleanMethod::Dangling);
        assert_eq!(parse_clean_method("symlink").unwrap(), CleanMethod::Symlink);
        assert_eq!(parse_clean_method("all").unwrap(), CleanMethod::All);
        assert_eq!(parse_clean_method("none").unwrap(), CleanMethod::None);
        assert!(matches!(
            parse_clean_method("some").unwrap_err(),
            ConfigError::InvalidClean { .. }
        ));
    }

    #[test]
    fn test_octal_modes() {
        assert_eq!(parse_octal_mode("0700").unwrap(), 0o700);
        assert_eq!(parse_octal_mode("755").unwrap(), 0o755);
        assert_eq!(parse_octal_mode("2775").unwrap(), 0o2775);

        for bad in ["", "778", "abc", "+7", "-7", "0o700", "17777"] {
            assert!(
                matches!(parse_octal_mode(bad), Err(ConfigError::InvalidMode { .. })),
                "'{bad}' should be rejected"
            );
        }
    }
}
