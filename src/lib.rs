//! # cleanup-manager
//!
//! Keeps a scratch, cache or download directory in check by removing what
//! has gone stale, or by removing just enough to free a given amount of
//! space.
//!
//! ## Overview
//!
//! Every direct child of the target directory is one unit of cleanup. A
//! folder counts as old only if nothing inside it is new, and its size is the
//! total of every regular file below it. Symbolic links are never followed:
//! they contribute neither age nor size, and any link that would dangle after
//! a cleanup (or that lives inside a removed folder) is removed too.
//!
//! ## Key Features
//!
//! - **Age threshold**: remove everything not modified since a date, given
//!   absolutely or relative to now (`4d`, `12H`, `7dr`)
//! - **Trigger files**: condemn a whole folder once a marker file inside it
//!   goes stale
//! - **Size target**: free a number of bytes, oldest or largest first, with
//!   or without overshooting
//! - **Link hygiene**: no dangling links left behind
//!
//! ## Architecture
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`commands`]: The cleanup command: select, confirm, remove
//! - [`error`]: Error types and handling with thiserror + miette
//! - [`inventory`]: One-level scan with per-folder aggregation
//! - [`select`]: Age and size selection plus the link closure
//! - [`remove`]: Removal of a selection through a pluggable [`remove::Remover`]
//!
//! Internal modules (not part of the public API):
//! - `keep_after`: Absolute and relative date parsing
//! - `size`: Size parsing and formatting
//! - `logging`: Verbosity-aware stderr logging
//!
//! ## Usage
//!
//! ```bash
//! # Remove everything older than a week (rounded to midnight)
//! cleanup-manager /srv/scratch
//!
//! # Free 15 GiB, largest items first, without asking
//! cleanup-manager /srv/scratch --freeup 15G --delete-largest-first --skip-prompt
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use cleanup_manager::cli::Cli;
//! use cleanup_manager::commands;
//!
//! let cli = Cli::builder()
//!     .target("/srv/scratch")
//!     .keep_after("30d")
//!     .dry_run(true)
//!     .build()?;
//!
//! commands::execute(&cli)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! - `thiserror` for strongly-typed errors
//! - `miette` for rich diagnostic output in CLI
//!
//! Problems with single entries, during the scan or the removal, are logged
//! and counted instead of failing the run.

pub mod cli;
pub mod commands;
pub mod error;
pub mod inventory;
pub mod remove;
pub mod select;

// Internal modules
mod keep_after;
mod logging;
mod size;

pub use logging::Logger;
