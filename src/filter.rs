//! Inclusion filtering for state snapshots.
//!
//! Everything under the state directory is included by default; the filter
//! is a pure denylist of glob patterns evaluated against relative paths.
//! `*` matches within one path segment, `**` matches any depth. Excluding a
//! directory excludes its whole subtree without enumerating it.

use crate::utils::errors::{Result, WizardError};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Denylist filter deciding which relative paths enter a snapshot.
#[derive(Debug, Clone)]
pub struct InclusionFilter {
    excludes: GlobSet,
}

impl InclusionFilter {
    /// Compile the exclude patterns. For every pattern the prefix-wise
    /// companion is added as well: `logs/**` also excludes the `logs`
    /// directory itself so traversal can prune there, and a bare `logs`
    /// also excludes everything beneath it.
    pub fn new(exclude_patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();

        for pattern in exclude_patterns {
            add_pattern(&mut builder, pattern)?;

            if let Some(prefix) = pattern.strip_suffix("/**") {
                add_pattern(&mut builder, prefix)?;
            } else if !pattern.contains("**") {
                add_pattern(&mut builder, &format!("{}/**", pattern))?;
            }
        }

        let excludes = builder
            .build()
            .map_err(|e| WizardError::Config(format!("Failed to build exclude set: {}", e)))?;

        Ok(Self { excludes })
    }

    /// Returns true if the relative path is eligible for inclusion.
    pub fn should_include(&self, relative_path: &Path) -> bool {
        !self.excludes.is_match(relative_path)
    }
}

fn add_pattern(builder: &mut GlobSetBuilder, pattern: &str) -> Result<()> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| WizardError::Config(format!("Invalid exclude pattern '{}': {}", pattern, e)))?;
    builder.add(glob);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str]) -> InclusionFilter {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        InclusionFilter::new(&patterns).unwrap()
    }

    #[test]
    fn test_empty_denylist_includes_everything() {
        let f = filter(&[]);

        assert!(f.should_include(Path::new("config.json")));
        assert!(f.should_include(Path::new(".hidden/settings.toml")));
        assert!(f.should_include(Path::new("deep/nested/tree/file.txt")));
    }

    #[test]
    fn test_exclude_takes_precedence() {
        let f = filter(&["logs/**"]);

        assert!(!f.should_include(Path::new("logs/out.txt")));
        assert!(f.should_include(Path::new("config.json")));
    }

    #[test]
    fn test_directory_exclude_covers_descendants() {
        let f = filter(&["logs/**"]);

        // The directory itself is prunable, and deep descendants match
        // without per-file enumeration.
        assert!(!f.should_include(Path::new("logs")));
        assert!(!f.should_include(Path::new("logs/2024/jan/out.txt")));
        // A sibling named similarly is untouched
        assert!(f.should_include(Path::new("logs-archive/out.txt")));
    }

    #[test]
    fn test_bare_directory_pattern_covers_subtree() {
        let f = filter(&["backups"]);

        assert!(!f.should_include(Path::new("backups")));
        assert!(!f.should_include(Path::new("backups/old/state.zip")));
        assert!(f.should_include(Path::new("backups.md")));
    }

    #[test]
    fn test_single_segment_wildcard() {
        let f = filter(&["workspace-gateway-*/**", "*.tmp"]);

        assert!(!f.should_include(Path::new("workspace-gateway-eu/session.json")));
        assert!(!f.should_include(Path::new("workspace-gateway-eu")));
        assert!(!f.should_include(Path::new("scratch.tmp")));
        // `*` does not cross path segments
        assert!(f.should_include(Path::new("sub/scratch.tmp")));
        assert!(f.should_include(Path::new("workspace/file.txt")));
    }

    #[test]
    fn test_any_depth_wildcard() {
        let f = filter(&["**/node_modules/**"]);

        assert!(!f.should_include(Path::new("a/node_modules/pkg/index.js")));
        assert!(!f.should_include(Path::new("a/b/c/node_modules/pkg/index.js")));
        assert!(f.should_include(Path::new("a/b/c/source.js")));
    }

    #[test]
    fn test_hidden_entries_included_by_default() {
        let f = filter(&["logs/**"]);

        assert!(f.should_include(Path::new(".env")));
        assert!(f.should_include(Path::new(".config/settings.json")));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = InclusionFilter::new(&["[invalid".to_string()]);
        assert!(result.is_err());
    }
}
