//! Backup catalog: listing and deleting archives in the backup directory.
//!
//! Archive filenames follow `<prefix>-<timestamp>.zip` where the timestamp
//! is RFC 3339 with `:` and `.` replaced by `-`, so lexicographic order is
//! chronological order. Two prefixes are used: `backup` for normal
//! snapshots and `pre-restore` for safety snapshots.

use crate::utils::errors::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Extension carried by every archive in the backup directory.
pub const ARCHIVE_EXT: &str = "zip";

/// Prefix for normal backups.
pub const BACKUP_PREFIX: &str = "backup";

/// Prefix for safety snapshots taken before a restore.
pub const PRE_RESTORE_PREFIX: &str = "pre-restore";

/// Build an archive filename from a prefix and a timestamp.
pub fn archive_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{}-{}.{}", prefix, stamp, ARCHIVE_EXT)
}

/// Listing data for one archive resident in the backup directory.
#[derive(Debug, Clone, Serialize)]
pub struct BackupRecord {
    pub file_name: String,
    pub modified: DateTime<Utc>,
    pub size: u64,
}

/// Catalog over a flat directory of archive files.
#[derive(Debug, Clone)]
pub struct BackupCatalog {
    backup_dir: PathBuf,
}

impl BackupCatalog {
    pub fn new(backup_dir: &Path) -> Self {
        Self {
            backup_dir: backup_dir.to_path_buf(),
        }
    }

    /// List archives newest-first (filename descending, which matches
    /// chronological order under the timestamp naming scheme). A missing
    /// backup directory yields an empty list.
    pub fn list(&self) -> Result<Vec<BackupRecord>> {
        if !self.backup_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().map(|e| e == ARCHIVE_EXT) != Some(true) {
                continue;
            }

            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let metadata = entry.metadata()?;
            records.push(BackupRecord {
                file_name,
                modified: DateTime::<Utc>::from(metadata.modified()?),
                size: metadata.len(),
            });
        }

        records.sort_by(|a, b| b.file_name.cmp(&a.file_name));
        Ok(records)
    }

    /// Delete one archive by bare filename. The target must carry no
    /// directory components and must have the archive extension; anything
    /// else is a no-op, as is a target that does not exist. Returns whether
    /// a file was removed.
    pub fn delete(&self, file_name: &str) -> Result<bool> {
        if !is_safe_archive_name(file_name) {
            return Ok(false);
        }

        let path = self.backup_dir.join(file_name);
        if !path.is_file() {
            return Ok(false);
        }

        fs::remove_file(&path)?;
        info!(file_name, "Deleted backup archive");
        Ok(true)
    }
}

/// A deletable name is exactly one normal path component ending in the
/// archive extension. Rejects separators, `..` and empty names.
fn is_safe_archive_name(file_name: &str) -> bool {
    let path = Path::new(file_name);
    let is_bare = path
        .file_name()
        .map(|n| n == file_name)
        .unwrap_or(false);
    is_bare && Path::new(file_name).extension().map(|e| e == ARCHIVE_EXT) == Some(true)
}
