//! Descriptor file discovery across search roots.
//!
//! The [`DescriptorFinder`] walks each configured search root and yields
//! `(relative path, base root)` pairs for every file found, in deterministic
//! order. The pipeline driver partitions the results by exact filename; the
//! finder itself does no filtering beyond pruning directories that must never
//! be descended into.
//!
//! Pruned directories:
//! - hidden directories (name starting with `.`)
//! - `node_modules` and `bower_components`, so artifacts of a previous
//!   install are never re-discovered as project descriptors

use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into during discovery.
const PRUNED_DIRS: [&str; 2] = ["node_modules", "bower_components"];

/// Enumerates candidate descriptor files across configured search roots.
#[derive(Debug, Clone)]
pub struct DescriptorFinder {
    search_roots: Vec<PathBuf>,
}

impl DescriptorFinder {
    /// Create a finder over the given search roots.
    #[must_use]
    pub fn new(search_roots: Vec<PathBuf>) -> Self {
        Self {
            search_roots,
        }
    }

    /// List every file under the search roots as `(relative, base)` pairs.
    ///
    /// Roots are visited in configuration order; within a root, entries are
    /// sorted by file name so discovery order is stable across platforms.
    /// A missing root is logged and skipped, not an error.
    #[must_use]
    pub fn list(&self) -> Vec<(PathBuf, PathBuf)> {
        let mut found = Vec::new();

        for root in &self.search_roots {
            if !root.is_dir() {
                warn!(target: "discovery", "search root is not a directory: {}", root.display());
                continue;
            }

            for entry in WalkDir::new(root)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|e| !is_pruned(e))
                .filter_map(std::result::Result::ok)
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Ok(relative) = entry.path().strip_prefix(root) {
                    found.push((relative.to_path_buf(), root.clone()));
                }
            }
        }

        debug!(target: "discovery", "found {} files across {} roots", found.len(), self.search_roots.len());
        found
    }
}

fn is_pruned(entry: &DirEntry) -> bool {
    // depth 0 is the search root itself, which may legitimately be hidden
    // (".tmp") or relative (".")
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.') || PRUNED_DIRS.contains(&name))
}
