//! The flattening engine.
//!
//! Walks the installed component directories under a staging area and copies
//! each component's declared "main" entry files into a single flat output
//! tree:
//!
//! 1. Pick the component's descriptor: `bower.json`, falling back to
//!    `.bower.json`, first match wins. A component with neither is skipped.
//! 2. Expand each `main` entry as a glob rooted at the component directory.
//!    A pattern with no matches contributes nothing and is not an error.
//! 3. Prefer a `.min` sibling of each matched file when one exists
//!    (`foo.js` → `foo.min.js`); the destination keeps the effective
//!    source's basename.
//! 4. Skip the copy when the destination already has identical content
//!    (SHA-256), making repeated runs free of filesystem writes.
//!
//! The output layout is `<output_root>/<component>/` or, in version-tagged
//! mode, `<output_root>/<component>-<version>/`. Version-tagged mode fails
//! for components that declare no version; that is a usage error, not
//! something to paper over with an unsuffixed directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use crate::core::BowerflatError;
use crate::descriptor::DescriptorCache;

/// Descriptor filenames tried per component, in priority order.
///
/// Only the first existing file is consulted; the fallback is never read
/// when the primary exists, even if the primary lacks fields.
pub const DESCRIPTOR_PRIORITY: [&str; 2] = ["bower.json", ".bower.json"];

/// Counters accumulated over one flattening run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenStats {
    /// Components with a descriptor that were processed
    pub components: usize,
    /// Files copied into the output tree
    pub copied: usize,
    /// Files skipped because the destination content already matched
    pub unchanged: usize,
    /// Resolved sources that no longer existed on disk
    pub missing: usize,
}

/// Flattens installed components into the output tree.
///
/// Owns the [`DescriptorCache`] for the run; both are dropped together when
/// flattening completes.
pub struct Flattener {
    cache: DescriptorCache,
    output_root: PathBuf,
    version_tagged: bool,
}

impl Flattener {
    /// Create a flattener writing into `output_root`.
    pub fn new(output_root: impl Into<PathBuf>, version_tagged: bool) -> Self {
        Self {
            cache: DescriptorCache::new(),
            output_root: output_root.into(),
            version_tagged,
        }
    }

    /// Flatten every component directory under `components_dir`.
    ///
    /// Components are visited in name order so logs and stats are
    /// deterministic. The output tree is only ever mutated incrementally;
    /// existing files are left alone unless their content differs.
    pub fn flatten(&mut self, components_dir: &Path) -> Result<FlattenStats> {
        let mut stats = FlattenStats::default();

        let mut component_dirs: Vec<PathBuf> = fs::read_dir(components_dir)
            .with_context(|| {
                format!("failed to read components directory: {}", components_dir.display())
            })?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        component_dirs.sort();

        for component_dir in &component_dirs {
            let Some(name) = component_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            println!("Component: {name}");
            self.flatten_component(name, component_dir, &mut stats)?;
        }

        Ok(stats)
    }

    fn flatten_component(
        &mut self,
        name: &str,
        component_dir: &Path,
        stats: &mut FlattenStats,
    ) -> Result<()> {
        let Some(descriptor_path) = find_descriptor(component_dir) else {
            debug!(target: "flatten", "no descriptor in {}, skipping", component_dir.display());
            return Ok(());
        };

        let descriptor = self.cache.load(&descriptor_path)?;
        let entries = descriptor.main_entries();
        let version = descriptor.declared_version().map(str::to_string);

        let dest_root = self.component_output_root(name, version.as_deref())?;
        stats.components += 1;

        for pattern in entries.iter().filter(|p| !p.is_empty()) {
            let src_pattern = component_dir.join(pattern);
            let matches = glob::glob(&src_pattern.to_string_lossy()).map_err(|_| {
                BowerflatError::InvalidMainPattern {
                    pattern: pattern.clone(),
                    component: name.to_string(),
                }
            })?;

            for src in matches.filter_map(std::result::Result::ok) {
                self.copy_resolved(&src, &dest_root, stats)?;
            }
        }

        Ok(())
    }

    /// The output directory for one component, version-suffixed when
    /// version-tagged mode is on.
    fn component_output_root(&self, name: &str, version: Option<&str>) -> Result<PathBuf> {
        if !self.version_tagged {
            return Ok(self.output_root.join(name));
        }
        // the suffix is appended to the directory name itself, so the
        // component name must be a real name, not an empty segment
        if name.is_empty() {
            return Err(BowerflatError::ConfigError {
                message: "cannot version-tag a component with an empty name".to_string(),
            }
            .into());
        }
        let version = version.ok_or_else(|| BowerflatError::MissingVersion {
            component: name.to_string(),
        })?;
        Ok(self.output_root.join(format!("{name}-{version}")))
    }

    fn copy_resolved(&self, src: &Path, dest_root: &Path, stats: &mut FlattenStats) -> Result<()> {
        // See if we have a minified alternative
        let src = minified_sibling(src).unwrap_or_else(|| src.to_path_buf());

        if !src.exists() {
            // only reachable when a file vanishes between glob expansion and
            // the copy; skip rather than attempt a copy that cannot succeed
            warn!(target: "flatten", "could not find source path: {}", src.display());
            stats.missing += 1;
            return Ok(());
        }

        let Some(basename) = src.file_name() else {
            return Ok(());
        };

        // Normalize both paths to absolute form
        let src = std::path::absolute(&src)
            .with_context(|| format!("failed to resolve source path: {}", src.display()))?;
        let dest_root = std::path::absolute(dest_root)
            .with_context(|| format!("failed to resolve output root: {}", dest_root.display()))?;
        let dest = dest_root.join(basename);

        // Check if we need to copy the file at all
        if dest.exists() && compute_checksum(&src)? == compute_checksum(&dest)? {
            trace!(target: "flatten", "unchanged: {}", dest.display());
            stats.unchanged += 1;
            return Ok(());
        }

        fs::create_dir_all(&dest_root).with_context(|| {
            format!("failed to create output directory: {}", dest_root.display())
        })?;

        info!(
            target: "flatten",
            "{} > {}{}",
            src.display(),
            dest_root.display(),
            std::path::MAIN_SEPARATOR
        );
        fs::copy(&src, &dest).with_context(|| {
            format!("failed to copy {} to {}", src.display(), dest.display())
        })?;
        stats.copied += 1;

        Ok(())
    }
}

/// Locate a component's descriptor file, trying [`DESCRIPTOR_PRIORITY`]
/// names in order and stopping at the first that exists.
#[must_use]
pub fn find_descriptor(component_dir: &Path) -> Option<PathBuf> {
    DESCRIPTOR_PRIORITY.iter().map(|name| component_dir.join(name)).find(|path| path.exists())
}

/// The `.min` sibling of a path, if one exists on disk.
///
/// `dist/foo.js` → `dist/foo.min.js`; an extensionless `foo` → `foo.min`.
/// Returns `None` when no such sibling exists, or when the path already is
/// its own minified form.
#[must_use]
pub fn minified_sibling(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?;
    let mut name = stem.to_os_string();
    name.push(".min");
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    let candidate = path.with_file_name(name);
    if candidate != path && candidate.exists() {
        Some(candidate)
    } else {
        None
    }
}

/// Compute a SHA-256 content digest in `sha256:<hex>` format.
pub fn compute_checksum(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};

    let content = fs::read(path)
        .with_context(|| format!("cannot read file for checksum: {}", path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&content);
    let result = hasher.finalize();

    Ok(format!("sha256:{}", hex::encode(result)))
}
