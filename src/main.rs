//! Bowerflat CLI entry point
//!
//! This is the main executable for bowerflat. It handles command-line argument
//! parsing, error display, and exit-code mapping.
//!
//! The CLI supports two commands:
//! - `install` - discover descriptor files, run the external install tools,
//!   then flatten the staged components
//! - `flatten` - flatten an already-populated staging directory

use anyhow::Result;
use bowerflat::cli;
use bowerflat::core::error::user_friendly_error;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(error_ctx.exit_code());
        }
    }
}
