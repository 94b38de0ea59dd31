//! # cleanup-manager CLI
//!
//! Removes stale items from a directory, by age or until a size target is
//! met.
//!
//! ## Quick Start
//!
//! ```bash
//! # Preview what a week-old cutoff would remove
//! cleanup-manager ~/Downloads --dry-run
//!
//! # Remove folders whose .expire marker is older than 30 days
//! cleanup-manager /srv/builds --keep-after 30d --trigger .expire
//!
//! # Free 500 MiB
//! cleanup-manager /var/cache/app --freeup 500M --skip-prompt
//! ```
//!
//! ## Environment Variables
//!
//! - `CLEANUP_MANAGER_TARGET`: Directory to clean
//! - `CLEANUP_MANAGER_KEEP_AFTER`: Age threshold
//! - `CLEANUP_MANAGER_FREEUP`: Size target
//! - `CLEANUP_MANAGER_VERBOSE`: Enable verbose output
//! - `CLEANUP_MANAGER_QUIET`: Silence all output except errors

use std::io::IsTerminal;

use clap::Parser;
use cleanup_manager::cli::Cli;

fn main() -> miette::Result<()> {
    miette::set_panic_hook();

    if std::io::stderr().is_terminal() {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::unicode_nocolor())
                    .with_context_lines(3),
            )
        }))?;
    } else {
        // Plain output for logs and cron mail
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::none())
                    .with_context_lines(0),
            )
        }))?;
    }

    let cli = Cli::parse();

    cleanup_manager::commands::execute(&cli).map_err(Into::into)
}
