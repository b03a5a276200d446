//! Component descriptor parsing and caching.
//!
//! A descriptor (`bower.json` or its installed sibling `.bower.json`) names a
//! component's distributable entry files and version. Only two fields are
//! consumed; everything else in the document is ignored:
//!
//! - `main` - absent, a single string, or a list of strings; each entry is a
//!   literal path or glob pattern relative to the descriptor's directory
//! - `version` - absent or a string
//!
//! The [`DescriptorCache`] memoizes parse results by path so each descriptor
//! is read and parsed at most once per pipeline run. The cache is owned by
//! the flattening engine and dropped with it; it is never global state.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::BowerflatError;

/// The `main` field of a descriptor: a single pattern or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MainField {
    /// A single entry-file pattern
    Single(String),
    /// A list of entry-file patterns
    List(Vec<String>),
}

/// A parsed component descriptor.
///
/// Unknown fields are intentionally not rejected: descriptors carry plenty of
/// metadata (`name`, `dependencies`, `ignore`, ...) that the flattening
/// engine has no use for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Descriptor {
    /// Declared entry-file patterns, in any of the three accepted shapes
    #[serde(default)]
    main: Option<MainField>,

    /// Declared component version
    #[serde(default)]
    version: Option<String>,
}

impl Descriptor {
    /// The descriptor's entry-file patterns, normalized to a list.
    ///
    /// Total over all three accepted shapes of `main`:
    /// - absent → empty list
    /// - a single string → one-element list
    /// - a list → returned unchanged
    #[must_use]
    pub fn main_entries(&self) -> Vec<String> {
        match &self.main {
            None => Vec::new(),
            Some(MainField::Single(entry)) => vec![entry.clone()],
            Some(MainField::List(entries)) => entries.clone(),
        }
    }

    /// The descriptor's declared version, if any.
    #[must_use]
    pub fn declared_version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

/// Lazily-populated, run-scoped cache of parsed descriptors keyed by path.
///
/// The first [`load`](Self::load) for a path reads and parses the file;
/// subsequent loads return the stored value without touching the filesystem.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: HashMap<PathBuf, Descriptor>,
}

impl DescriptorCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the descriptor at `path`, parsing it on first access.
    ///
    /// # Errors
    ///
    /// Returns [`BowerflatError::DescriptorParseError`] if the file is not
    /// valid JSON, or an IO error with context if it cannot be read. Parse
    /// failures are not cached; a corrected file is re-read on the next call.
    pub fn load(&mut self, path: &Path) -> Result<&Descriptor> {
        match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(cached) => Ok(cached.into_mut()),
            Entry::Vacant(slot) => {
                debug!(target: "descriptor", "parsing {}", path.display());
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read descriptor: {}", path.display()))?;
                let descriptor: Descriptor =
                    serde_json::from_str(&raw).map_err(|e| BowerflatError::DescriptorParseError {
                        file: path.display().to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(slot.insert(descriptor))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Descriptor {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_main_entries_absent() {
        let descriptor = parse(r#"{"name": "jquery"}"#);
        assert!(descriptor.main_entries().is_empty());
    }

    #[test]
    fn test_main_entries_scalar() {
        let descriptor = parse(r#"{"main": "dist/jquery.js"}"#);
        assert_eq!(descriptor.main_entries(), vec!["dist/jquery.js".to_string()]);
    }

    #[test]
    fn test_main_entries_list() {
        let descriptor = parse(r#"{"main": ["dist/a.js", "dist/a.css"]}"#);
        assert_eq!(
            descriptor.main_entries(),
            vec!["dist/a.js".to_string(), "dist/a.css".to_string()]
        );
    }

    #[test]
    fn test_declared_version() {
        let descriptor = parse(r#"{"version": "3.1.0"}"#);
        assert_eq!(descriptor.declared_version(), Some("3.1.0"));

        let descriptor = parse(r#"{"main": "a.js"}"#);
        assert_eq!(descriptor.declared_version(), None);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let descriptor = parse(
            r#"{
                "name": "jquery",
                "main": "dist/jquery.js",
                "version": "3.1.0",
                "dependencies": {"sizzle": "^2.3.0"},
                "ignore": ["test"]
            }"#,
        );
        assert_eq!(descriptor.main_entries(), vec!["dist/jquery.js".to_string()]);
        assert_eq!(descriptor.declared_version(), Some("3.1.0"));
    }

    #[test]
    fn test_cache_parses_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bower.json");
        fs::write(&path, r#"{"main": "a.js", "version": "1.0.0"}"#).unwrap();

        let mut cache = DescriptorCache::new();
        assert_eq!(cache.load(&path).unwrap().declared_version(), Some("1.0.0"));

        // Rewriting the file must not be observed; the first parse is cached.
        fs::write(&path, r#"{"main": "b.js", "version": "9.9.9"}"#).unwrap();
        assert_eq!(cache.load(&path).unwrap().declared_version(), Some("1.0.0"));
        assert_eq!(cache.load(&path).unwrap().main_entries(), vec!["a.js".to_string()]);
    }

    #[test]
    fn test_cache_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bower.json");
        fs::write(&path, "{not json").unwrap();

        let mut cache = DescriptorCache::new();
        let err = cache.load(&path).unwrap_err().downcast::<BowerflatError>().unwrap();
        assert!(matches!(err, BowerflatError::DescriptorParseError { .. }));
    }

    #[test]
    fn test_cache_missing_file() {
        let mut cache = DescriptorCache::new();
        assert!(cache.load(Path::new("/nonexistent/bower.json")).is_err());
    }
}
