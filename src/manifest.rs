//! Archive manifest types.
//!
//! Every archive carries a `manifest.json` at its root describing when and
//! by what it was produced. The manifest is descriptive/auditable only:
//! extraction locates the `state/` and `workspace/` sections by name and
//! never requires the manifest to be present.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Format-version tag written into every archive.
pub const FORMAT_TAG: &str = "state-backup-v1";

/// Name of the manifest entry at the archive root.
pub const MANIFEST_NAME: &str = "manifest.json";

/// Archive manifest — serialized as `manifest.json` at the archive root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Creation timestamp, RFC 3339
    pub created_at: String,
    /// Producing application name
    pub app: String,
    /// Format-version tag
    pub format: String,
    pub includes: ManifestIncludes,
}

/// Structural description of what the archive should contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestIncludes {
    /// Absolute path of the state root that was captured
    pub state_root: String,
    /// Workspace entry names captured alongside the state tree
    pub workspace: Vec<String>,
}

impl Manifest {
    pub fn new(app: &str, state_root: &Path, workspace_entries: &[String]) -> Self {
        Self {
            created_at: chrono::Utc::now().to_rfc3339(),
            app: app.to_string(),
            format: FORMAT_TAG.to_string(),
            includes: ManifestIncludes {
                state_root: state_root.display().to_string(),
                workspace: workspace_entries.to_vec(),
            },
        }
    }

    /// Pretty-printed JSON as written into the archive
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_field_names() {
        let manifest = Manifest::new(
            "Backup Wizard",
            Path::new("/srv/state"),
            &["MEMORY.md".to_string(), "memory".to_string()],
        );

        let json = manifest.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("createdAt").is_some());
        assert_eq!(value["app"], "Backup Wizard");
        assert_eq!(value["format"], FORMAT_TAG);
        assert_eq!(value["includes"]["stateRoot"], "/srv/state");
        assert_eq!(value["includes"]["workspace"][0], "MEMORY.md");
    }

    #[test]
    fn test_manifest_round_trip() {
        let manifest = Manifest::new("Backup Wizard", Path::new("/srv/state"), &[]);
        let json = manifest.to_json().unwrap();
        let parsed: Manifest = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.format, manifest.format);
        assert_eq!(parsed.created_at, manifest.created_at);
    }
}
