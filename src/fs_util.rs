//! Filesystem helpers shared by the archive and restore paths.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Recursively copy `src` (file or directory) onto `dst`, creating parent
/// directories as needed. Files already present under `dst` are overwritten
/// when the same relative path exists in `src`; files only present under
/// `dst` are left untouched (merge-by-overwrite, not a mirror sync).
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }

    if src.is_dir() {
        for entry in WalkDir::new(src).follow_links(false) {
            let entry = entry.map_err(io::Error::from)?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            let target = dst.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
            }
        }
    } else {
        fs::copy(src, dst)?;
    }

    Ok(())
}

/// Remove a file or directory tree if it exists. Missing targets are not
/// an error.
pub fn remove_path(target: &Path) -> io::Result<()> {
    if !target.exists() {
        return Ok(());
    }

    if target.is_dir() {
        fs::remove_dir_all(target)
    } else {
        fs::remove_file(target)
    }
}
