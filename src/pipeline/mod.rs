//! The install pipeline driver.
//!
//! Orchestrates the full run: discover descriptor files across the search
//! roots, run each tool phase in a fixed order (`npm install`, then the
//! default grunt task, then `bower install`), and finally flatten whatever
//! bower staged into the output tree.
//!
//! Phases run strictly sequentially; a later phase may depend on artifacts
//! produced by an earlier one (a Gruntfile that emits a `bower.json`, for
//! example). A failing install aborts the run rather than flattening a
//! partially-populated staging area.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Settings;
use crate::discovery::DescriptorFinder;
use crate::flatten::Flattener;
use crate::tool;

/// Descriptor file handled by the npm phase.
pub const PACKAGE_DESCRIPTOR: &str = "package.json";
/// Descriptor file handled by the grunt phase.
pub const TASK_RUNNER_DESCRIPTOR: &str = "Gruntfile.js";
/// Descriptor file handled by the bower phase.
pub const COMPONENT_DESCRIPTOR: &str = "bower.json";
/// Directory bower creates under the staging directory.
pub const BOWER_COMPONENTS_DIR: &str = "bower_components";

/// Descriptor paths discovered for one run, grouped by tool phase.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PhasePlan {
    /// `package.json` files, in discovery order
    pub npm: Vec<PathBuf>,
    /// `Gruntfile.js` files, in discovery order
    pub grunt: Vec<PathBuf>,
    /// `bower.json` files, in discovery order
    pub bower: Vec<PathBuf>,
}

impl PhasePlan {
    /// Partition discovered `(relative, base)` pairs into tool phases by
    /// exact filename. Anything else is ignored.
    #[must_use]
    pub fn from_discovered(found: &[(PathBuf, PathBuf)]) -> Self {
        let mut plan = Self::default();
        for (relative, base) in found {
            let Some(name) = relative.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match name {
                PACKAGE_DESCRIPTOR => plan.npm.push(base.join(relative)),
                TASK_RUNNER_DESCRIPTOR => plan.grunt.push(base.join(relative)),
                COMPONENT_DESCRIPTOR => plan.bower.push(base.join(relative)),
                _ => {}
            }
        }
        plan
    }
}

/// Drives a full install-and-flatten run from loaded settings.
pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    /// Create a pipeline over the given settings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
        }
    }

    /// Run the full pipeline.
    ///
    /// Returns `Ok(())` when nothing was staged (there is simply nothing to
    /// flatten); install and flattening failures propagate as errors.
    pub async fn run(&self) -> Result<()> {
        let staging = std::path::absolute(&self.settings.staging_dir).with_context(|| {
            format!("failed to resolve staging directory: {}", self.settings.staging_dir.display())
        })?;
        fs::create_dir_all(&staging).with_context(|| {
            format!("failed to create staging directory: {}", staging.display())
        })?;

        let finder = DescriptorFinder::new(self.settings.search_roots.clone());
        let plan = PhasePlan::from_discovered(&finder.list());
        debug!(
            target: "pipeline",
            "discovered {} npm, {} grunt, {} bower descriptors",
            plan.npm.len(),
            plan.grunt.len(),
            plan.bower.len()
        );

        for descriptor in &plan.npm {
            info!(target: "pipeline", "npm install for {}", descriptor.display());
            tool::npm_install(parent_dir(descriptor)).await?;
        }

        for descriptor in &plan.grunt {
            info!(target: "pipeline", "grunt for {}", descriptor.display());
            tool::grunt_default(parent_dir(descriptor)).await?;
        }

        for descriptor in &plan.bower {
            info!(target: "pipeline", "bower install for {}", descriptor.display());
            tool::bower_install(descriptor, &staging).await?;
        }

        let components_dir = staging.join(BOWER_COMPONENTS_DIR);
        if !components_dir.is_dir() {
            println!("No components seem to have been installed by bower, exiting.");
            return Ok(());
        }

        let mut flattener =
            Flattener::new(self.settings.output_root(), self.settings.version_tagged);
        let stats = flattener.flatten(&components_dir)?;
        println!(
            "Flattened {} components: {} copied, {} unchanged",
            stats.components, stats.copied, stats.unchanged
        );

        Ok(())
    }
}

fn parent_dir(descriptor: &Path) -> &Path {
    descriptor.parent().unwrap_or_else(|| Path::new("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_plan_partitions_by_filename() {
        let base = PathBuf::from("/srv/app");
        let found = vec![
            (PathBuf::from("bower.json"), base.clone()),
            (PathBuf::from("js/package.json"), base.clone()),
            (PathBuf::from("js/Gruntfile.js"), base.clone()),
            (PathBuf::from("README.md"), base.clone()),
            (PathBuf::from("vendor/bower.json"), base.clone()),
        ];

        let plan = PhasePlan::from_discovered(&found);
        assert_eq!(plan.npm, vec![base.join("js/package.json")]);
        assert_eq!(plan.grunt, vec![base.join("js/Gruntfile.js")]);
        assert_eq!(
            plan.bower,
            vec![base.join("bower.json"), base.join("vendor/bower.json")]
        );
    }

    #[test]
    fn test_phase_plan_requires_exact_names() {
        let base = PathBuf::from("/srv/app");
        let found = vec![
            (PathBuf::from(".bower.json"), base.clone()),
            (PathBuf::from("package.json.bak"), base.clone()),
            (PathBuf::from("gruntfile.js"), base.clone()),
        ];

        let plan = PhasePlan::from_discovered(&found);
        assert_eq!(plan, PhasePlan::default());
    }

    #[test]
    fn test_phase_plan_preserves_discovery_order() {
        let first = PathBuf::from("/srv/first");
        let second = PathBuf::from("/srv/second");
        let found = vec![
            (PathBuf::from("bower.json"), first.clone()),
            (PathBuf::from("bower.json"), second.clone()),
        ];

        let plan = PhasePlan::from_discovered(&found);
        assert_eq!(plan.bower, vec![first.join("bower.json"), second.join("bower.json")]);
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir(Path::new("/srv/app/package.json")), Path::new("/srv/app"));
        assert_eq!(parent_dir(Path::new("package.json")), Path::new(""));
    }
}
