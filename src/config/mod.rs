//! Settings management for bowerflat.
//!
//! Bowerflat reads an optional `bowerflat.toml` from the working directory
//! (or the path passed via `--config`). Every field has a default, so the
//! tool runs without any settings file at all.
//!
//! # Settings File Format
//!
//! ```toml
//! # Directories scanned for descriptor files (package.json, Gruntfile.js,
//! # bower.json). Relative paths are resolved against the working directory.
//! search_roots = ["app/assets", "vendor/assets"]
//!
//! # Base directory for static output. The flattened components land in
//! # <static_root>/components unless output_root overrides it.
//! static_root = "static"
//!
//! # Explicit output directory for flattened components (optional).
//! # output_root = "public/components"
//!
//! # Working directory for installs (bower stages bower_components here).
//! staging_dir = ".tmp"
//!
//! # Suffix each component's output directory with its declared version.
//! version_tagged = false
//! ```
//!
//! CLI flags always take precedence over file values; the commands apply
//! their overrides after [`Settings::load_or_default`] returns.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::BowerflatError;

/// Default settings file name, searched in the working directory.
pub const SETTINGS_FILE: &str = "bowerflat.toml";

/// Default staging directory for installs.
pub const DEFAULT_STAGING_DIR: &str = ".tmp";

/// Default static root when none is configured.
pub const DEFAULT_STATIC_ROOT: &str = "static";

/// Subdirectory of the static root receiving flattened components.
pub const COMPONENTS_SUBDIR: &str = "components";

/// Runtime settings for the install/flatten pipeline.
///
/// Deserialized from `bowerflat.toml` with per-field defaults, then adjusted
/// by CLI flag overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directories scanned for descriptor files.
    #[serde(default)]
    pub search_roots: Vec<PathBuf>,

    /// Base directory for static output.
    #[serde(default = "default_static_root")]
    pub static_root: PathBuf,

    /// Explicit output directory for flattened components.
    ///
    /// When `None`, defaults to `<static_root>/components`.
    #[serde(default)]
    pub output_root: Option<PathBuf>,

    /// Working directory for installs.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,

    /// Suffix each component's output directory with its declared version.
    #[serde(default)]
    pub version_tagged: bool,
}

fn default_static_root() -> PathBuf {
    PathBuf::from(DEFAULT_STATIC_ROOT)
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STAGING_DIR)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search_roots: Vec::new(),
            static_root: default_static_root(),
            output_root: None,
            staging_dir: default_staging_dir(),
            version_tagged: false,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BowerflatError::SettingsParseError`] if the file is not
    /// valid TOML or contains unknown fields, or an IO error with context if
    /// it cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(target: "config", "loading settings from {}", path.display());
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file: {}", path.display()))?;

        let settings: Self = toml::from_str(&raw).map_err(|e| BowerflatError::SettingsParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Ok(settings)
    }

    /// Load settings from an explicit path, the default location, or defaults.
    ///
    /// An explicitly given path must exist; the default `bowerflat.toml` is
    /// optional and silently falls back to [`Settings::default`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(BowerflatError::SettingsNotFound {
                        path: path.display().to_string(),
                    }
                    .into());
                }
                Self::load(path)
            }
            None => {
                let default_path = Path::new(SETTINGS_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    debug!(target: "config", "no {SETTINGS_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// The effective output root for flattened components.
    #[must_use]
    pub fn output_root(&self) -> PathBuf {
        self.output_root.clone().unwrap_or_else(|| self.static_root.join(COMPONENTS_SUBDIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.search_roots.is_empty());
        assert_eq!(settings.staging_dir, PathBuf::from(".tmp"));
        assert_eq!(settings.output_root(), PathBuf::from("static").join("components"));
        assert!(!settings.version_tagged);
    }

    #[test]
    fn test_output_root_override() {
        let settings = Settings {
            output_root: Some(PathBuf::from("public/assets")),
            ..Default::default()
        };
        assert_eq!(settings.output_root(), PathBuf::from("public/assets"));
    }

    #[test]
    fn test_load_full_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(
            &path,
            r#"
search_roots = ["app/assets", "vendor/assets"]
static_root = "public"
staging_dir = "build/.tmp"
version_tagged = true
"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.search_roots.len(), 2);
        assert_eq!(settings.static_root, PathBuf::from("public"));
        assert_eq!(settings.staging_dir, PathBuf::from("build/.tmp"));
        assert!(settings.version_tagged);
        assert_eq!(settings.output_root(), PathBuf::from("public").join("components"));
    }

    #[test]
    fn test_load_partial_settings_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"search_roots = ["app"]"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.search_roots, vec![PathBuf::from("app")]);
        assert_eq!(settings.staging_dir, PathBuf::from(".tmp"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "search_roots = [unclosed").unwrap();

        let err = Settings::load(&path).unwrap_err();
        let err = err.downcast::<BowerflatError>().unwrap();
        assert!(matches!(err, BowerflatError::SettingsParseError { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "staging_dirr = \".tmp\"").unwrap();

        assert!(Settings::load(&path).is_err());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let err = Settings::load_or_default(Some(Path::new("/nonexistent/bowerflat.toml")))
            .unwrap_err()
            .downcast::<BowerflatError>()
            .unwrap();
        assert!(matches!(err, BowerflatError::SettingsNotFound { .. }));
    }
}
