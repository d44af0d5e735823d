//! Restore orchestration.
//!
//! A restore never touches live data before a safety snapshot of the
//! current state has been written, and it only ever overwrites live paths
//! the archive also contains. Files present live but absent from the
//! archive survive the merge. The scratch extraction directory is removed
//! on every exit path.

use crate::archive::{self, ArchiveWriter, STATE_PREFIX, WORKSPACE_PREFIX};
use crate::catalog::{archive_file_name, PRE_RESTORE_PREFIX};
use crate::config::Config;
use crate::fs_util;
use crate::utils::errors::{Result, WizardError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Coordinates one restore: safety snapshot, extraction, merge, cleanup.
pub struct RestoreCoordinator {
    config: Config,
}

impl RestoreCoordinator {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Restore `incoming` over the live state and workspace locations.
    ///
    /// Returns the path of the safety snapshot written before any live
    /// mutation, which remains on disk as the recovery path. The incoming
    /// archive itself is never deleted; that is the caller's call.
    pub fn restore(&self, incoming: &Path) -> Result<PathBuf> {
        if !incoming.is_file() {
            return Err(WizardError::NotFound(format!(
                "Archive does not exist: {}",
                incoming.display()
            )));
        }

        // Safety snapshot first. If this fails, no live data has been
        // touched and the restore aborts here.
        let safety_path = self
            .config
            .paths
            .backup_dir
            .join(archive_file_name(PRE_RESTORE_PREFIX, chrono::Utc::now()));
        ArchiveWriter::new(&self.config)?.write(&safety_path)?;
        info!(safety = %safety_path.display(), "Safety snapshot written");

        let scratch = self.config.paths.scratch_dir.clone();
        // Stale leftovers from a prior failed restore are cleared first.
        fs_util::remove_path(&scratch)?;
        fs::create_dir_all(&scratch)?;

        let outcome = self.apply(incoming, &scratch);

        // Cleanup runs regardless of which step failed.
        let cleanup = fs_util::remove_path(&scratch);

        outcome?;
        cleanup?;

        info!(archive = %incoming.display(), "Restore complete");
        Ok(safety_path)
    }

    /// Extract the incoming archive and merge its sections into the live
    /// locations. Merge is overwrite-by-presence: sections or entries
    /// absent from the archive leave the corresponding live paths alone.
    fn apply(&self, incoming: &Path, scratch: &Path) -> Result<()> {
        archive::extract(incoming, scratch)?;

        let state_src = scratch.join(STATE_PREFIX);
        if state_src.is_dir() {
            info!(target = %self.config.paths.state_dir.display(), "Merging state tree");
            fs_util::copy_tree(&state_src, &self.config.paths.state_dir)?;
        } else {
            debug!("Archive has no state section, leaving live state untouched");
        }

        let workspace_src = scratch.join(WORKSPACE_PREFIX);
        if workspace_src.exists() {
            for entry in &self.config.backup.workspace_entries {
                let src = workspace_src.join(entry);
                if !src.exists() {
                    debug!(entry, "Workspace entry not in archive, skipping");
                    continue;
                }
                let dst = self.config.paths.workspace_dir.join(entry);
                fs_util::copy_tree(&src, &dst)?;
            }
        }

        Ok(())
    }
}
