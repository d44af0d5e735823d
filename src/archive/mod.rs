//! Archive layout contract shared by the writer and the reader.
//!
//! Every archive has exactly two top-level namespaces plus a manifest:
//! `state/**` mirrors the filtered state directory, `workspace/**` mirrors
//! the workspace entries, and `manifest.json` sits at the root.

pub mod reader;
pub mod writer;

pub use reader::extract;
pub use writer::ArchiveWriter;

/// Top-level archive namespace for the state tree.
pub const STATE_PREFIX: &str = "state";

/// Top-level archive namespace for workspace entries.
pub const WORKSPACE_PREFIX: &str = "workspace";
