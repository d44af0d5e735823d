//! Backup Wizard Library
//!
//! Snapshot, archive and restore engine for agent state. A backup captures
//! the filtered state directory plus a fixed list of workspace entries into
//! a single zip archive; a restore takes a safety snapshot first and then
//! merges the archive back over the live directories.

pub mod archive;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod filter;
pub mod fs_util;
pub mod manifest;
pub mod restore;
pub mod utils;

// Re-export commonly used types
pub use catalog::{BackupCatalog, BackupRecord};
pub use config::Config;
pub use engine::BackupEngine;
pub use utils::errors::WizardError;
pub type Result<T> = std::result::Result<T, WizardError>;
