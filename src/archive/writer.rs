//! Archive creation.
//!
//! Streams the filtered state tree, each present workspace entry and a
//! generated manifest into a single zip archive. The destination is written
//! through a `.partial` temp name and renamed into place on success, so a
//! failed write never leaves a usable-looking archive behind.

use crate::archive::{STATE_PREFIX, WORKSPACE_PREFIX};
use crate::config::Config;
use crate::filter::InclusionFilter;
use crate::manifest::{Manifest, MANIFEST_NAME};
use crate::utils::errors::{Result, WizardError};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writer for the two-section state/workspace archive format.
pub struct ArchiveWriter {
    app_name: String,
    state_dir: PathBuf,
    workspace_dir: PathBuf,
    workspace_entries: Vec<String>,
    filter: InclusionFilter,
}

impl ArchiveWriter {
    /// Build a writer from the resolved configuration. Fails if an exclude
    /// pattern does not compile.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            app_name: config.backup.app_name.clone(),
            state_dir: config.paths.state_dir.clone(),
            workspace_dir: config.paths.workspace_dir.clone(),
            workspace_entries: config.backup.workspace_entries.clone(),
            filter: InclusionFilter::new(&config.backup.state_excludes)?,
        })
    }

    /// Write a complete archive to `dest`. On failure the partial output is
    /// removed and the caller must treat the destination as absent.
    pub fn write(&self, dest: &Path) -> Result<()> {
        let file_name = dest
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                WizardError::Validation(format!(
                    "Invalid archive destination: {}",
                    dest.display()
                ))
            })?;
        let partial = dest.with_file_name(format!("{}.partial", file_name));

        match self.write_to(&partial) {
            Ok(entries) => {
                fs::rename(&partial, dest)?;
                info!(archive = %dest.display(), entries, "Archive written");
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_file(&partial);
                Err(e)
            }
        }
    }

    fn write_to(&self, path: &Path) -> Result<usize> {
        let manifest = Manifest::new(&self.app_name, &self.state_dir, &self.workspace_entries);

        let file = File::create(path)?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut entries = 0usize;

        if self.state_dir.is_dir() {
            entries += self.append_tree(&mut zip, &self.state_dir, STATE_PREFIX, true, options)?;
        } else {
            debug!(state_dir = %self.state_dir.display(), "State directory absent, skipping");
        }

        for entry in &self.workspace_entries {
            let src = self.workspace_dir.join(entry);
            if !src.exists() {
                debug!(entry, "Workspace entry absent, skipping");
                continue;
            }

            let name = entry_name(WORKSPACE_PREFIX, Path::new(entry));
            if src.is_dir() {
                zip.add_directory(name.clone(), options)?;
                entries += 1;
                entries += self.append_tree(&mut zip, &src, &name, false, options)?;
            } else {
                append_file(&mut zip, &src, &name, options)?;
                entries += 1;
            }
        }

        zip.start_file(MANIFEST_NAME, options)?;
        io::Write::write_all(&mut zip, manifest.to_json()?.as_bytes())?;
        entries += 1;

        zip.finish()?;
        Ok(entries)
    }

    /// Append every entry under `root` beneath `prefix`, applying the
    /// inclusion filter when `filtered` is set. Directory excludes prune
    /// the walk so excluded subtrees are never enumerated.
    fn append_tree(
        &self,
        zip: &mut ZipWriter<File>,
        root: &Path,
        prefix: &str,
        filtered: bool,
        options: SimpleFileOptions,
    ) -> Result<usize> {
        let mut entries = 0usize;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                if !filtered {
                    return true;
                }
                let relative = e.path().strip_prefix(root).unwrap_or(e.path());
                relative.as_os_str().is_empty() || self.filter.should_include(relative)
            });

        for entry in walker {
            let entry = entry.map_err(io::Error::from)?;
            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf();
            if relative.as_os_str().is_empty() {
                continue;
            }

            let name = entry_name(prefix, &relative);
            if entry.file_type().is_dir() {
                zip.add_directory(name, options)?;
                entries += 1;
            } else if entry.file_type().is_symlink() {
                // Archive symlinks by content when they resolve to a file;
                // broken links and directory links are skipped.
                match fs::metadata(entry.path()) {
                    Ok(meta) if meta.is_file() => {
                        append_file(zip, entry.path(), &name, options)?;
                        entries += 1;
                    }
                    _ => debug!(path = %entry.path().display(), "Skipping unresolvable symlink"),
                }
            } else {
                append_file(zip, entry.path(), &name, options)?;
                entries += 1;
            }
        }

        Ok(entries)
    }
}

fn append_file(
    zip: &mut ZipWriter<File>,
    src: &Path,
    name: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(name, options)?;
    let mut input = File::open(src)?;
    io::copy(&mut input, zip)?;
    Ok(())
}

/// Join a relative path onto an archive namespace with forward slashes.
fn entry_name(prefix: &str, relative: &Path) -> String {
    let mut name = String::from(prefix);
    for component in relative.components() {
        name.push('/');
        name.push_str(&component.as_os_str().to_string_lossy());
    }
    name
}
