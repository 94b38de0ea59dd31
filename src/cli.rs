//! Command-line interface definitions for cleanup-manager.
//!
//! The whole tool is a single command, so [`Cli`] is one flat set of
//! options. Every option can also be supplied through a
//! `CLEANUP_MANAGER_*` environment variable.
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use cleanup_manager::cli::Cli;
//!
//! let cli = Cli::parse();
//!
//! match (cli.keep_after(), cli.freeup()) {
//!     (_, Some(size)) => println!("Freeing up {size}"),
//!     (Some(date), None) => println!("Keeping items newer than {date}"),
//!     (None, None) => println!("Using the default age threshold"),
//! }
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::{CleanupError, Result};
use crate::keep_after::DEFAULT_DATE_FORMAT;
use crate::select::SizeOrder;


/// Remove stale folders, files and links from a directory.
///
/// Items are chosen either by age (`--keep-after`) or until a number of
/// bytes has been freed (`--freeup`). Folders are judged by their newest
/// content and their total size.
#[derive(Debug, Parser)]
#[command(
    name = "cleanup-manager",
    bin_name = "cleanup-manager",
    author,
    version,
    about = "Clean up a directory by age or until enough space is freed",
    long_about = None
)]
pub struct Cli {
    /// Directory to clean (defaults to the current directory)
    #[arg(env = "CLEANUP_MANAGER_TARGET")]
    target: Option<PathBuf>,

    /// Remove items not modified since this date: an absolute date in
    /// --date-format, or a relative one like "4d", "12H" or "7dr" (default)
    #[arg(
        short,
        long,
        allow_hyphen_values = true,
        env = "CLEANUP_MANAGER_KEEP_AFTER"
    )]
    keep_after: Option<String>,

    /// strftime format used for absolute --keep-after dates
    #[arg(
        short,
        long,
        default_value = DEFAULT_DATE_FORMAT,
        env = "CLEANUP_MANAGER_DATE_FORMAT"
    )]
    date_format: String,

    /// Remove items until this much space is freed (e.g. "15G", "500M", or
    /// bytes)
    #[arg(
        short,
        long,
        conflicts_with = "keep_after",
        env = "CLEANUP_MANAGER_FREEUP"
    )]
    freeup: Option<String>,

    /// With --freeup, remove the least recently modified items first
    /// (default)
    #[arg(long, conflicts_with = "delete_largest_first")]
    delete_oldest_first: bool,

    /// With --freeup, remove the largest items first
    #[arg(long, env = "CLEANUP_MANAGER_DELETE_LARGEST_FIRST")]
    delete_largest_first: bool,

    /// With --freeup, let the last item removed push past the target
    #[arg(long, env = "CLEANUP_MANAGER_OVERFLOW")]
    overflow: bool,

    /// Remove any folder holding a file of this name that is older than
    /// --keep-after, however recent the rest of the folder is
    #[arg(
        short,
        long,
        conflicts_with = "freeup",
        env = "CLEANUP_MANAGER_TRIGGER"
    )]
    trigger: Option<String>,

    /// Do not ask for confirmation before removing anything
    #[arg(long, env = "CLEANUP_MANAGER_SKIP_PROMPT")]
    skip_prompt: bool,

    /// Show what would be removed without removing it
    #[arg(long, env = "CLEANUP_MANAGER_DRY_RUN")]
    dry_run: bool,

    /// Enable verbose output (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, env = "CLEANUP_MANAGER_VERBOSE")]
    verbose: u8,

    /// Silence all output except for errors
    #[arg(
        short,
        long,
        conflicts_with = "verbose",
        env = "CLEANUP_MANAGER_QUIET"
    )]
    quiet: bool,
}

impl Cli {
    /// Create a builder for programmatic construction
    pub fn builder() -> CliBuilder {
        CliBuilder::default()
    }

    /// Get the target directory as given
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// Get the absolute target directory, defaulting to the current one
    pub fn get_target_dir(&self) -> PathBuf {
        normalize_path(self.target.as_deref().unwrap_or(Path::new(".")))
    }

    /// Get the keep-after date specification
    pub fn keep_after(&self) -> Option<&str> {
        self.keep_after.as_deref()
    }

    /// Get the absolute date format
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Get the free-up size specification
    pub fn freeup(&self) -> Option<&str> {
        self.freeup.as_deref()
    }

    /// Get the size-mode ordering
    pub fn order(&self) -> SizeOrder {
        if self.delete_largest_first && !self.delete_oldest_first {
            SizeOrder::LargestFirst
        } else {
            SizeOrder::OldestFirst
        }
    }

    /// Check if overflow is allowed in size mode
    pub fn overflow(&self) -> bool {
        self.overflow
    }

    /// Get the trigger file name
    pub fn trigger(&self) -> Option<&str> {
        self.trigger.as_deref()
    }

    /// Check if the confirmation prompt is skipped
    pub fn skip_prompt(&self) -> bool {
        self.skip_prompt
    }

    /// Check if this is a dry run
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Get the verbose level
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    /// Check if quiet mode is enabled
    pub fn quiet(&self) -> bool {
        self.quiet
    }
}

/// Builder for [`Cli`]
#[derive(Debug, Default)]
pub struct CliBuilder {
    target: Option<PathBuf>,
    keep_after: Option<String>,
    date_format: Option<String>,
    freeup: Option<String>,
    order: SizeOrder,
    overflow: bool,
    trigger: Option<String>,
    skip_prompt: bool,
    dry_run: bool,
    verbose: u8,
    quiet: bool,
}

impl CliBuilder {
    /// Set the target directory
    pub fn target(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target = Some(dir.into());
        self
    }

    /// Set the keep-after date specification
    pub fn keep_after(mut self, spec: impl Into<String>) -> Self {
        self.keep_after = Some(spec.into());
        self
    }

    /// Set the absolute date format
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Set the free-up size specification
    pub fn freeup(mut self, size: impl Into<String>) -> Self {
        self.freeup = Some(size.into());
        self
    }

    /// Set the size-mode ordering
    pub fn order(mut self, order: SizeOrder) -> Self {
        self.order = order;
        self
    }

    /// Allow overflow in size mode
    pub fn overflow(mut self, enabled: bool) -> Self {
        self.overflow = enabled;
        self
    }

    /// Set the trigger file name
    pub fn trigger(mut self, name: impl Into<String>) -> Self {
        self.trigger = Some(name.into());
        self
    }

    /// Skip the confirmation prompt
    pub fn skip_prompt(mut self, enabled: bool) -> Self {
        self.skip_prompt = enabled;
        self
    }

    /// Enable dry-run mode
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Set the verbose level
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable quiet mode
    pub fn quiet(mut self, enabled: bool) -> Self {
        self.quiet = enabled;
        self
    }

    /// Build the Cli instance
    pub fn build(self) -> Result<Cli> {
        if self.keep_after.is_some() && self.freeup.is_some() {
            return Err(CleanupError::Config(
                "You may only specify one of keep-after and free-up".to_string(),
            ));
        }

        Ok(Cli {
            target: self.target,
            keep_after: self.keep_after,
            date_format: self
                .date_format
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            freeup: self.freeup,
            delete_oldest_first: self.order == SizeOrder::OldestFirst,
            delete_largest_first: self.order == SizeOrder::LargestFirst,
            overflow: self.overflow,
            trigger: self.trigger,
            skip_prompt: self.skip_prompt,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
        })
    }
}

/// Normalize a path to be absolute and clean, without requiring it to exist.
///
/// Relative paths are joined onto the current directory and `.`/`..`
/// components are folded. Symlinks are left alone.
pub(crate) fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    let absolute = if path.is_relative() {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    } else {
        path.to_path_buf()
    };

    let mut components = Vec::new();
    for component in absolute.components() {
        use std::path::Component;
        match component {
            Component::ParentDir => {
                if let Some(last) = components.last()
                    && !matches!(last, Component::ParentDir | Component::RootDir)
                {
                    components.pop();
                    continue;
                }
                if matches!(components.last(), Some(Component::RootDir)) {
                    continue;
                }
                components.push(component);
            }
            Component::CurDir => continue,
            _ => components.push(component),
        }
    }

    components.into_iter().collect()
}
