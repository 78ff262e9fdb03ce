//! Removal of per-session user data, tolerating transient file locks.
//!
//! The engine's child processes can hold locks on the partition directory
//! slightly past disposal, so deletion retries on a fixed backoff. This is
//! best-effort: exhausting the retries logs a warning and never fails the
//! run.

use std::fs;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::paths;

/// Total delete attempts: one initial try plus five retries.
pub const DELETE_ATTEMPTS: u32 = 6;

/// Fixed spacing between delete attempts.
pub const DELETE_BACKOFF: Duration = Duration::from_secs(1);

/// Outcome of a removal run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupOutcome {
    pub removed: bool,
    pub attempts: u32,
}

/// Deletes user-data directories with bounded retries.
pub struct CleanupManager {
    max_attempts: u32,
    backoff: Duration,
}

impl Default for CleanupManager {
    fn default() -> Self {
        Self {
            max_attempts: DELETE_ATTEMPTS,
            backoff: DELETE_BACKOFF,
        }
    }
}

impl CleanupManager {
    /// Override the retry policy. Attempt counts below 1 are clamped up.
    pub fn with_policy(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Recursively remove the partition directory. Precondition: the
    /// session is disposed; the caller did not request retention.
    pub fn remove_partition(&self, dir: &Path) -> CleanupOutcome {
        self.remove_with(dir, |p| fs::remove_dir_all(p))
    }

    pub(crate) fn remove_with(
        &self,
        dir: &Path,
        mut delete: impl FnMut(&Path) -> io::Result<()>,
    ) -> CleanupOutcome {
        if !dir.exists() {
            debug!("user data at {} already gone", dir.display());
            return CleanupOutcome {
                removed: true,
                attempts: 0,
            };
        }

        info!("cleaning up user data at {}", dir.display());
        let mut attempts = 0;
        while attempts < self.max_attempts {
            attempts += 1;
            if let Err(e) = delete(dir) {
                // Lock contention, already-gone entries and permission
                // faults are expected transient conditions here.
                debug!("delete attempt {attempts} failed: {e}");
            }
            if !dir.exists() {
                info!("user data removed after {attempts} attempt(s)");
                return CleanupOutcome {
                    removed: true,
                    attempts,
                };
            }
            if attempts < self.max_attempts {
                thread::sleep(self.backoff);
            }
        }

        warn!(
            "user data at {} could not be deleted after {} attempts",
            dir.display(),
            attempts
        );
        CleanupOutcome {
            removed: false,
            attempts,
        }
    }

    /// Remove every partition directory of the current user plus the
    /// persisted-bounds file. Backs the `cleanup` subcommand.
    pub fn sweep_user_data(&self) -> usize {
        let app_dir = paths::app_data_dir();
        let prefix = paths::partition_prefix();
        let mut removed = 0;

        let entries = match fs::read_dir(&app_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("no user data to sweep at {}: {}", app_dir.display(), e);
                return 0;
            }
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with(prefix.as_str()) {
                continue;
            }
            if entry.path().is_dir() && self.remove_partition(&entry.path()).removed {
                removed += 1;
            }
        }

        let bounds = paths::bounds_file();
        if bounds.exists() {
            if let Err(e) = fs::remove_file(&bounds) {
                warn!("could not remove {}: {}", bounds.display(), e);
            }
        }

        removed
    }
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
