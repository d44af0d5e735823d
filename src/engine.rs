//! Engine facade tying the components together.
//!
//! One engine owns the resolved configuration and serializes backup and
//! restore: the writer reads live state while a restore overwrites it, so
//! only one of the two may run at a time per engine.

use crate::archive::ArchiveWriter;
use crate::catalog::{archive_file_name, BackupCatalog, BACKUP_PREFIX};
use crate::config::Config;
use crate::restore::RestoreCoordinator;
use crate::utils::errors::Result;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::info;

pub struct BackupEngine {
    config: Config,
    catalog: BackupCatalog,
    // One active backup/restore at a time
    op_lock: Mutex<()>,
}

impl BackupEngine {
    pub fn new(config: Config) -> Self {
        let catalog = BackupCatalog::new(&config.paths.backup_dir);
        Self {
            config,
            catalog,
            op_lock: Mutex::new(()),
        }
    }

    /// Snapshot the live state into a new archive in the backup directory.
    /// Returns the created archive's path.
    pub fn backup(&self) -> Result<PathBuf> {
        let _guard = self.op_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let dest = self
            .config
            .paths
            .backup_dir
            .join(archive_file_name(BACKUP_PREFIX, chrono::Utc::now()));
        info!(dest = %dest.display(), "Creating backup");
        ArchiveWriter::new(&self.config)?.write(&dest)?;
        Ok(dest)
    }

    /// Restore an archive over the live state, taking a safety snapshot
    /// first. Returns the safety snapshot's path. Confirmation is the
    /// caller's responsibility; the engine always restores when invoked.
    pub fn restore(&self, incoming: &Path) -> Result<PathBuf> {
        let _guard = self.op_lock.lock().unwrap_or_else(PoisonError::into_inner);

        RestoreCoordinator::new(&self.config).restore(incoming)
    }

    pub fn catalog(&self) -> &BackupCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackupConfig, LogConfig, PathsConfig};
    use std::fs;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn test_config(root: &Path) -> Config {
        Config {
            paths: PathsConfig {
                state_dir: root.join("state"),
                workspace_dir: root.join("state/workspace"),
                backup_dir: root.join("backups"),
                scratch_dir: root.join("runtime/restore"),
            },
            backup: BackupConfig {
                app_name: "Backup Wizard".to_string(),
                workspace_entries: vec!["MEMORY.md".to_string()],
                state_excludes: vec!["logs/**".to_string(), "workspace/**".to_string()],
            },
            log: LogConfig::default(),
        }
    }

    fn populate(config: &Config) {
        fs::create_dir_all(config.paths.state_dir.join("logs")).unwrap();
        fs::create_dir_all(&config.paths.workspace_dir).unwrap();
        fs::create_dir_all(&config.paths.backup_dir).unwrap();
        fs::write(config.paths.state_dir.join("config.json"), b"{\"a\":1}").unwrap();
        fs::write(config.paths.state_dir.join("logs/out.txt"), b"noise").unwrap();
        fs::write(config.paths.workspace_dir.join("MEMORY.md"), b"# memory").unwrap();
    }

    /// All entry names except the manifest, sorted.
    fn tree_names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive
            .file_names()
            .filter(|n| *n != "manifest.json")
            .map(|n| n.to_string())
            .collect();
        names.sort();
        names
    }

    fn entry_bytes(path: &Path, name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut buf = Vec::new();
        std::io::Read::read_to_end(&mut entry, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_backup_creates_named_archive() -> crate::Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(temp_dir.path());
        populate(&config);

        let engine = BackupEngine::new(config);
        let path = engine.backup()?;

        assert!(path.is_file());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("backup-"));
        assert!(name.ends_with(".zip"));
        assert_eq!(engine.catalog().list()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_round_trip_preserves_bytes() -> crate::Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(temp_dir.path());
        populate(&config);

        let engine = BackupEngine::new(config.clone());
        let archive_path = engine.backup()?;

        assert_eq!(
            entry_bytes(&archive_path, "state/config.json"),
            b"{\"a\":1}"
        );
        assert_eq!(
            entry_bytes(&archive_path, "workspace/MEMORY.md"),
            b"# memory"
        );
        // Excluded paths are absent from the archive entirely
        assert!(!tree_names(&archive_path)
            .iter()
            .any(|n| n.starts_with("state/logs")));
        Ok(())
    }

    #[test]
    fn test_repeated_backup_is_idempotent() -> crate::Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(temp_dir.path());
        populate(&config);

        let engine = BackupEngine::new(config);
        let first = engine.backup()?;
        let second = engine.backup()?;

        // Same tree, same bytes; only the manifests may differ
        assert_eq!(tree_names(&first), tree_names(&second));
        for name in tree_names(&first) {
            if !name.ends_with('/') {
                assert_eq!(entry_bytes(&first, &name), entry_bytes(&second, &name));
            }
        }
        Ok(())
    }

    #[test]
    fn test_backup_then_restore_round_trip() -> crate::Result<()> {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(temp_dir.path());
        populate(&config);

        let engine = BackupEngine::new(config.clone());
        let archive_path = engine.backup()?;

        // Mutate live state, then restore the snapshot
        fs::write(config.paths.state_dir.join("config.json"), b"mutated")?;
        let safety = engine.restore(&archive_path)?;

        assert_eq!(
            fs::read(config.paths.state_dir.join("config.json"))?,
            b"{\"a\":1}"
        );
        // The mutated content is recoverable from the safety snapshot
        assert_eq!(entry_bytes(&safety, "state/config.json"), b"mutated");
        Ok(())
    }
}
