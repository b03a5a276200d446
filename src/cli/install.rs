//! The `install` command: the full discover/install/flatten pipeline.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::pipeline::Pipeline;

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallCommand {
    /// Directories to scan for descriptor files (overrides settings)
    #[arg(short, long, value_name = "DIR")]
    search_root: Vec<PathBuf>,

    /// Working directory for installs (overrides settings)
    #[arg(long, value_name = "DIR")]
    staging_dir: Option<PathBuf>,

    /// Output directory for flattened components (overrides settings)
    #[arg(short, long, value_name = "DIR")]
    output_root: Option<PathBuf>,

    /// Suffix each component's output directory with its version
    #[arg(long)]
    version_tagged: bool,
}

impl InstallCommand {
    /// Load settings, apply flag overrides, and run the pipeline.
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let mut settings = Settings::load_or_default(config_path)?;

        if !self.search_root.is_empty() {
            settings.search_roots = self.search_root;
        }
        if let Some(staging_dir) = self.staging_dir {
            settings.staging_dir = staging_dir;
        }
        if let Some(output_root) = self.output_root {
            settings.output_root = Some(output_root);
        }
        if self.version_tagged {
            settings.version_tagged = true;
        }

        Pipeline::new(settings).run().await
    }
}
