//! The `flatten` command: flatten an already-populated staging directory
//! without running any install tools.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::flatten::Flattener;
use crate::pipeline::BOWER_COMPONENTS_DIR;

/// Arguments for the flatten command.
#[derive(Args)]
pub struct FlattenCommand {
    /// Staging directory holding `bower_components` (overrides settings)
    #[arg(long, value_name = "DIR")]
    staging_dir: Option<PathBuf>,

    /// Output directory for flattened components (overrides settings)
    #[arg(short, long, value_name = "DIR")]
    output_root: Option<PathBuf>,

    /// Suffix each component's output directory with its version
    #[arg(long)]
    version_tagged: bool,
}

impl FlattenCommand {
    /// Load settings, apply flag overrides, and flatten the staged components.
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let mut settings = Settings::load_or_default(config_path)?;

        if let Some(staging_dir) = self.staging_dir {
            settings.staging_dir = staging_dir;
        }
        if let Some(output_root) = self.output_root {
            settings.output_root = Some(output_root);
        }
        if self.version_tagged {
            settings.version_tagged = true;
        }

        let staging = std::path::absolute(&settings.staging_dir).with_context(|| {
            format!("failed to resolve staging directory: {}", settings.staging_dir.display())
        })?;
        let components_dir = staging.join(BOWER_COMPONENTS_DIR);
        if !components_dir.is_dir() {
            println!("No components seem to have been installed by bower, exiting.");
            return Ok(());
        }

        let mut flattener = Flattener::new(settings.output_root(), settings.version_tagged);
        let stats = flattener.flatten(&components_dir)?;
        println!(
            "Flattened {} components: {} copied, {} unchanged",
            stats.components, stats.copied, stats.unchanged
        );

        Ok(())
    }
}
