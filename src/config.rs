//! Configuration for the backup wizard.
//!
//! All paths and rule lists are resolved once at construction and passed
//! into each component explicitly. Loads from a TOML file with per-field
//! defaults, or builds the standard deployment layout from a home directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Primary state directory captured under `state/` in every archive
    pub state_dir: PathBuf,

    /// Workspace root the workspace entries are resolved against
    pub workspace_dir: PathBuf,

    /// Flat directory holding finished archives
    pub backup_dir: PathBuf,

    /// Scratch directory used to unpack an archive during restore
    pub scratch_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Application name recorded in every manifest
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Fixed ordered list of workspace entries (files or directories),
    /// relative to the workspace root
    #[serde(default = "default_workspace_entries")]
    pub workspace_entries: Vec<String>,

    /// Glob denylist evaluated against paths relative to the state directory
    #[serde(default = "default_state_excludes")]
    pub state_excludes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values
fn default_app_name() -> String {
    "Backup Wizard".to_string()
}

fn default_workspace_entries() -> Vec<String> {
    [
        "AGENTS.md",
        "SOUL.md",
        "USER.md",
        "TOOLS.md",
        "IDENTITY.md",
        "HEARTBEAT.md",
        "MEMORY.md",
        "memory",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_state_excludes() -> Vec<String> {
    [
        // Huge/transient runtime data (not configuration)
        "browser/**",
        "logs/**",
        "media/**",
        "delivery-queue/**",
        "subagents/**",
        "agents/**",
        "cron/runs/**",
        "backups/**",
        // Workspace data is backed up separately via the entry list
        "workspace/**",
        "workspace-gateway-*/**",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            workspace_entries: default_workspace_entries(),
            state_excludes: default_state_excludes(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Build the standard deployment layout rooted at a home directory:
    /// state in `<home>/.agent`, workspace inside the state directory,
    /// archives and restore scratch under `<home>/.backup-wizard`.
    pub fn for_home(home: &Path) -> Self {
        let state_dir = home.join(".agent");
        let data_dir = home.join(".backup-wizard");

        Config {
            paths: PathsConfig {
                workspace_dir: state_dir.join("workspace"),
                state_dir,
                backup_dir: data_dir.join("backups"),
                scratch_dir: data_dir.join("runtime").join("restore"),
            },
            backup: BackupConfig::default(),
            log: LogConfig::default(),
        }
    }

    /// Create the backup and scratch parent directories up front
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.paths.backup_dir)?;
        if let Some(parent) = self.paths.scratch_dir.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}
