//! Archive extraction.
//!
//! Unpacks every entry of an archive into a destination directory,
//! recreating the original relative layout. Entries whose resolved path
//! would escape the destination are skipped; a crafted archive must never
//! place a file outside the extraction root.

use crate::utils::errors::{Result, WizardError};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Extract `archive_path` into `dest`, creating it if needed. On failure the
/// destination may hold a partial tree; removing it is the caller's job.
pub fn extract(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        WizardError::Extraction(format!(
            "{} is not a valid archive: {}",
            archive_path.display(),
            e
        ))
    })?;

    fs::create_dir_all(dest)?;
    debug!(archive = %archive_path.display(), entries = archive.len(), "Extracting archive");

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        // Traversal defense: entries like `../../etc/passwd` resolve to
        // None and are dropped.
        let relative = match entry.enclosed_name() {
            Some(path) => path,
            None => {
                warn!(entry = %entry.name(), "Skipping archive entry with unsafe path");
                continue;
            }
        };
        let outpath = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)?;
            io::copy(&mut entry, &mut outfile)?;
        }
    }

    Ok(())
}
