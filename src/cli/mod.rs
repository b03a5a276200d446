//! Command-line interface for bowerflat.
//!
//! Defines the argument structure via clap derive and dispatches to the
//! per-command modules. Global flags (`--verbose`, `--quiet`, `--config`)
//! are resolved here; logging is initialized before any command runs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod flatten;
pub mod install;

/// Install front-end dependencies and flatten them into a static tree
#[derive(Parser)]
#[command(name = "bowerflat")]
#[command(version)]
#[command(about = "Install front-end dependencies and flatten their entry files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the settings file (defaults to ./bowerflat.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover descriptors, run install tools, and flatten the result
    Install(install::InstallCommand),
    /// Flatten an already-populated staging directory
    Flatten(flatten::FlattenCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.verbose, self.quiet);

        match self.command {
            Commands::Install(cmd) => cmd.execute(self.config.as_deref()).await,
            Commands::Flatten(cmd) => cmd.execute(self.config.as_deref()),
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes effect when neither `--verbose` nor `--quiet` is given.
fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // try_init so repeated initialization in tests is harmless
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_quiet_conflict() {
        let result = Cli::try_parse_from(["bowerflat", "install", "--verbose", "--quiet"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["bowerflat", "flatten", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }
}
