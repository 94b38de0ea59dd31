//! Implementation of the cleanup-manager command.
//!
//! `mod.rs` turns parsed CLI options into a [`Policy`] and hands off to
//! [`Cleanup`], which does the selecting, confirming and removing.

use chrono::Local;

use crate::cli::Cli;
use crate::error::{CleanupError, Result};
use crate::keep_after::{DEFAULT_KEEP_AFTER, parse_keep_after};
use crate::select::Policy;
use crate::size::parse_byte_count;

pub(crate) mod cleanup;

pub use cleanup::{Cleanup, CleanupBuilder, CleanupOutcome};


/// Execute the cleanup described by the parsed CLI arguments.
pub fn execute(cli: &Cli) -> Result<()> {
    let quiet = cli.quiet();
    let verbose = if quiet { 0 } else { cli.verbose() };
    let target_dir = cli.get_target_dir();

    Cleanup::builder()
        .target_dir(&target_dir)
        .policy(resolve_policy(cli)?)
        .skip_prompt(cli.skip_prompt())
        .dry_run(cli.dry_run())
        .verbose(verbose)
        .quiet(quiet)
        .build()?
        .run()
        .map(|_| ())
}

/// Turn the `--freeup` / `--keep-after` options into a selection policy.
///
/// Without either option, items not modified since midnight seven days ago
/// (`7dr`) are removed.
pub fn resolve_policy(cli: &Cli) -> Result<Policy> {
    match (cli.freeup(), cli.keep_after()) {
        (Some(_), Some(_)) => Err(CleanupError::Config(
            "You may only specify one of keep-after and free-up".to_string(),
        )),
        (Some(size), None) => {
            if cli.trigger().is_some() {
                return Err(CleanupError::Config(
                    "A trigger file only applies to keep-after selection".to_string(),
                ));
            }
            Ok(Policy::FreeUp {
                target_bytes: parse_byte_count(size)?,
                order: cli.order(),
                allow_overflow: cli.overflow(),
            })
        }
        (None, keep_after) => {
            let spec = keep_after.unwrap_or(DEFAULT_KEEP_AFTER);
            Ok(Policy::KeepAfter {
                cutoff: parse_keep_after(spec, cli.date_format(), Local::now())?,
                trigger: cli.trigger().map(str::to_string),
            })
        }
    }
}
