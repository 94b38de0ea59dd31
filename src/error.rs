//! Error types for cleanup-manager.
//!
//! This module defines all error types used throughout cleanup-manager, using
//! a combination of `thiserror` for ergonomic error definitions and `miette`
//! for rich diagnostic output.
//!
//! # Error Handling Strategy
//!
//! - All errors derive from [`CleanupError`]
//! - Fatal errors ([`CleanupError::InvalidTarget`], [`CleanupError::Config`])
//!   abort before anything is selected
//! - Per-item errors ([`CleanupError::FilesystemRace`],
//!   [`CleanupError::Removal`]) are logged and counted, never propagated
//! - Errors are automatically converted to `miette::Result` for CLI output
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use cleanup_manager::error::{CleanupError, Result};
//!
//! fn check_target(path: &Path) -> Result<()> {
//!     if !path.is_dir() {
//!         return Err(CleanupError::InvalidTarget(path.to_path_buf()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error types that can occur in cleanup-manager operations
#[derive(Error, Debug, Diagnostic)]
pub enum CleanupError {
    /// The directory to clean does not exist or is not a directory.
    ///
    /// Raised by the inventory builder before any entry is examined. Nothing
    /// is selected or removed when this occurs.
    #[error("The target must be a valid, existing directory: '{0}'")]
    #[diagnostic(
        code(cleanup_manager::target::invalid),
        help("Pass the path of an existing directory as the cleanup target.")
    )]
    InvalidTarget(
        /// The path that was given as the target
        PathBuf,
    ),

    /// The caller violated a precondition of the selector.
    ///
    /// Raised when neither an inventory nor a target directory was given,
    /// or when the age and size policies were both (or neither) requested.
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(cleanup_manager::config::error),
        help("Specify exactly one of --keep-after and --freeup.")
    )]
    Config(
        /// Description of the configuration error
        String,
    ),

    /// An entry vanished or became unreadable between listing and stat.
    ///
    /// Never propagated: the inventory builder logs it, records the path in
    /// [`crate::inventory::Inventory::skipped`] and carries on without the
    /// entry's contribution to its folder's age and size.
    #[error("Skipped '{path}' while scanning")]
    #[diagnostic(code(cleanup_manager::inventory::race), severity(Warning))]
    FilesystemRace {
        /// The entry that could not be examined
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File system I/O error outside of the per-entry walk.
    #[error("I/O error accessing '{path}'")]
    #[diagnostic(code(cleanup_manager::io_error))]
    Io {
        /// The path that caused the I/O error
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A selected item could not be removed.
    ///
    /// Logged and counted by [`crate::remove::remove_selection`]; the
    /// remaining removals still run.
    #[error("Failed to remove '{path}'")]
    #[diagnostic(
        code(cleanup_manager::remove::failed),
        severity(Warning),
        help("Check permissions on the item and its parent directory.")
    )]
    Removal {
        /// The item that could not be removed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid size specification for --freeup.
    ///
    /// Valid suffixes are B (bytes), K (kilobytes), M (megabytes),
    /// G (gigabytes), or T (terabytes). Numbers without suffix are bytes.
    #[error("Invalid size: '{0}' - {1}")]
    #[diagnostic(
        code(cleanup_manager::size::invalid),
        help("Specify a size as a number with optional suffix (e.g., '15G', '500M', or raw bytes)")
    )]
    InvalidSize(
        /// The invalid size value provided
        String,
        /// Description of the parsing error
        String,
    ),

    /// Invalid date specification for --keep-after.
    #[error("Invalid date: '{0}' - {1}")]
    #[diagnostic(
        code(cleanup_manager::date::invalid),
        help(
            "Give an absolute date matching --date-format, or a relative date such as '4d', \
             '12H' or '7dr' (rounded back to midnight)."
        )
    )]
    InvalidDate(
        /// The invalid date value provided
        String,
        /// Description of the parsing error
        String,
    ),

    /// The user declined the confirmation prompt.
    #[error("Cleanup cancelled by user")]
    #[diagnostic(code(cleanup_manager::prompt::declined))]
    Aborted,
}

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CleanupError>;
