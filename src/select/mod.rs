//! Deletion selection over an [`Inventory`].
//!
//! Two policies are supported:
//! - Age: remove everything not modified since a cutoff, optionally
//!   condemning whole folders through a stale trigger file
//! - Size: remove folders and files, oldest or largest first, until a byte
//!   target is met
//!
//! Both finish with the same link closure: links that would dangle, or that
//! live inside a removed folder, are unmade too.
//!
//! # Example
//!
//! ```no_run
//! use cleanup_manager::Logger;
//! use cleanup_manager::select::{Selector, SizeOrder};
//!
//! let selection = Selector::builder()
//!     .target_dir("/srv/scratch")
//!     .free_bytes(15 * 1024 * 1024 * 1024)
//!     .order(SizeOrder::LargestFirst)
//!     .build()?
//!     .select(&Logger::new(0, false))?;
//!
//! println!("Would free {} bytes", selection.freed_bytes);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{CleanupError, Result};
use crate::inventory::{Inventory, build_inventory};
use crate::logging::Logger;

mod by_age;
mod by_size;
mod links;

pub use by_age::select_by_age;
pub use by_size::{SizeOrder, select_by_size};

/// The items chosen for removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub folders: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
    pub links: Vec<PathBuf>,
    /// Bytes the selected folders and files account for. In size mode this
    /// is the accumulated total the greedy loop stopped at.
    pub freed_bytes: u64,
}

impl Selection {
    /// Whether nothing at all was selected
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty() && self.links.is_empty()
    }

    fn logged(self, log: &Logger) -> Self {
        for folder in &self.folders {
            log.verbose(2, format!("    Set to remove folder: {}", folder.display()));
        }
        for file in &self.files {
            log.verbose(2, format!("    Set to remove file: {}", file.display()));
        }
        for link in &self.links {
            log.verbose(2, format!("    Set to remove link: {}", link.display()));
        }
        self
    }
}

/// The rule a [`Selector`] applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Policy {
    /// Remove everything last modified before `cutoff`
    KeepAfter {
        cutoff: SystemTime,
        trigger: Option<String>,
    },
    /// Remove items until `target_bytes` would be freed
    FreeUp {
        target_bytes: u64,
        order: SizeOrder,
        allow_overflow: bool,
    },
}

#[derive(Debug)]
enum Source {
    Inventory(Inventory),
    Target(PathBuf),
}

/// A validated selection request: one inventory source and one policy.
#[derive(Debug)]
pub struct Selector {
    source: Source,
    policy: Policy,
}

impl Selector {
    /// Creates a new builder for [`Selector`]
    pub fn builder() -> SelectorBuilder {
        SelectorBuilder::default()
    }

    /// Get the policy
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Get the target directory, when the inventory is still to be built
    pub fn target_dir(&self) -> Option<&Path> {
        match &self.source {
            Source::Target(path) => Some(path),
            Source::Inventory(_) => None,
        }
    }

    /// Run the policy, scanning the target first if no inventory was given.
    ///
    /// # Errors
    ///
    /// Only the scan can fail; see [`build_inventory`].
    pub fn select(&self, log: &Logger) -> Result<Selection> {
        match &self.source {
            Source::Inventory(inventory) => Ok(self.select_from(inventory, log)),
            Source::Target(path) => {
                let inventory = build_inventory(path, log)?;
                Ok(self.select_from(&inventory, log))
            }
        }
    }

    fn select_from(&self, inventory: &Inventory, log: &Logger) -> Selection {
        match &self.policy {
            Policy::KeepAfter { cutoff, trigger } => select_by_age(
                *cutoff,
                inventory.folders(),
                inventory.files(),
                inventory.links(),
                trigger.as_deref(),
                log,
            ),
            Policy::FreeUp {
                target_bytes,
                order,
                allow_overflow,
            } => select_by_size(
                *target_bytes,
                *order,
                *allow_overflow,
                inventory.folders(),
                inventory.files(),
                inventory.links(),
                log,
            ),
        }
    }
}

/// Builder for [`Selector`]
#[derive(Debug, Default)]
pub struct SelectorBuilder {
    target_dir: Option<PathBuf>,
    inventory: Option<Inventory>,
    keep_after: Option<SystemTime>,
    trigger: Option<String>,
    free_bytes: Option<u64>,
    order: SizeOrder,
    allow_overflow: bool,
}

impl SelectorBuilder {
    /// Scan this directory when selecting
    pub fn target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_dir = Some(dir.into());
        self
    }

    /// Select from an existing inventory instead of scanning
    pub fn inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = Some(inventory);
        self
    }

    /// Remove everything last modified before `cutoff`
    pub fn keep_after(mut self, cutoff: SystemTime) -> Self {
        self.keep_after = Some(cutoff);
        self
    }

    /// Name of the file whose staleness condemns its folder
    pub fn trigger(mut self, name: impl Into<String>) -> Self {
        self.trigger = Some(name.into());
        self
    }

    /// Remove items until this many bytes would be freed
    pub fn free_bytes(mut self, bytes: u64) -> Self {
        self.free_bytes = Some(bytes);
        self
    }

    /// Set the size-mode ordering
    pub fn order(mut self, order: SizeOrder) -> Self {
        self.order = order;
        self
    }

    /// Let the last item taken push past the byte target
    pub fn allow_overflow(mut self, enabled: bool) -> Self {
        self.allow_overflow = enabled;
        self
    }

    /// Apply an already resolved [`Policy`]
    pub fn policy(self, policy: Policy) -> Self {
        match policy {
            Policy::KeepAfter { cutoff, trigger } => {
                let builder = self.keep_after(cutoff);
                match trigger {
                    Some(name) => builder.trigger(name),
                    None => builder,
                }
            }
            Policy::FreeUp {
                target_bytes,
                order,
                allow_overflow,
            } => self
                .free_bytes(target_bytes)
                .order(order)
                .allow_overflow(allow_overflow),
        }
    }

    /// Build the [`Selector`].
    ///
    /// An inventory takes precedence over a target directory.
    ///
    /// # Errors
    ///
    /// [`CleanupError::Config`] if neither an inventory nor a target was
    /// given, if not exactly one of `keep_after` and `free_bytes` was set, or
    /// if a trigger was given for size-based selection.
    pub fn build(self) -> Result<Selector> {
        let source = match (self.inventory, self.target_dir) {
            (Some(inventory), _) => Source::Inventory(inventory),
            (None, Some(path)) => Source::Target(path),
            (None, None) => {
                return Err(CleanupError::Config(
                    "Must give either a target or the inventory".to_string(),
                ));
            }
        };

        let policy = match (self.keep_after, self.free_bytes) {
            (Some(cutoff), None) => Policy::KeepAfter {
                cutoff,
                trigger: self.trigger,
            },
            (None, Some(target_bytes)) => {
                if self.trigger.is_some() {
                    return Err(CleanupError::Config(
                        "A trigger file only applies to keep-after selection".to_string(),
                    ));
                }
                Policy::FreeUp {
                    target_bytes,
                    order: self.order,
                    allow_overflow: self.allow_overflow,
                }
            }
            (Some(_), Some(_)) => {
                return Err(CleanupError::Config(
                    "You may only specify one of keep-after and free-up".to_string(),
                ));
            }
            (None, None) => {
                return Err(CleanupError::Config(
                    "Did not specify either keep-after or free-up".to_string(),
                ));
            }
        };

        Ok(Selector { source, policy })
    }
}
