//! External tool invocation for bowerflat.
//!
//! This module provides a fluent builder for running the external install
//! tools (`npm`, `grunt`, `bower`) with consistent error handling, plus the
//! three high-level operations the pipeline drives.
//!
//! Every invocation takes an explicit working directory instead of mutating
//! the process-wide current directory, so invocation order imposes no hidden
//! coupling and the driver's own cwd is never touched.
//!
//! # Error Mapping
//!
//! - Spawn failure because the binary is absent →
//!   [`BowerflatError::ToolMissing`] (exit code 1)
//! - `--version` probe ran but exited non-zero →
//!   [`BowerflatError::ToolProbeFailed`] (exit code 2)
//! - Install command exited non-zero → [`BowerflatError::InstallFailed`]

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::core::BowerflatError;

/// The npm binary name.
pub const NPM: &str = "npm";
/// The grunt binary name.
pub const GRUNT: &str = "grunt";
/// The bower binary name.
pub const BOWER: &str = "bower";

/// Check whether a command binary can be located in PATH.
#[must_use]
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Type-safe builder for constructing and executing external tool commands.
///
/// Modeled as a fluent API: chain [`arg`](Self::arg)/[`args`](Self::args)/
/// [`current_dir`](Self::current_dir) calls and finish with
/// [`execute`](Self::execute) or [`execute_success`](Self::execute_success).
///
/// # Defaults
///
/// - Output capture enabled (use [`inherit_stdio`](Self::inherit_stdio) to
///   stream the tool's output to the terminal instead)
/// - Working directory: the current process directory
pub struct ToolCommand {
    /// Tool binary to invoke
    program: String,

    /// Arguments to pass to the tool
    args: Vec<String>,

    /// Working directory for command execution
    current_dir: Option<PathBuf>,

    /// Whether to capture command output (true) or inherit stdio (false)
    capture_output: bool,
}

impl ToolCommand {
    /// Create a builder for the given tool binary.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            capture_output: true,
        }
    }

    /// Add a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for command execution.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Disable output capture, letting the tool write directly to the
    /// terminal. Install commands use this so users see the tool's own
    /// progress output.
    #[must_use]
    pub const fn inherit_stdio(mut self) -> Self {
        self.capture_output = false;
        self
    }

    /// Execute the command and return its output.
    ///
    /// Blocks (awaits) until the tool exits. A non-zero exit is NOT an error
    /// at this level; callers inspect [`ToolOutput::success`] and decide.
    ///
    /// # Errors
    ///
    /// Returns [`BowerflatError::ToolMissing`] if the binary cannot be
    /// spawned because it does not exist.
    pub async fn execute(self) -> Result<ToolOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
            debug!(
                target: "tool",
                "executing in {}: {} {}",
                dir.display(),
                self.program,
                self.args.join(" ")
            );
        } else {
            debug!(target: "tool", "executing: {} {}", self.program, self.args.join(" "));
        }

        if self.capture_output {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        } else {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BowerflatError::ToolMissing {
                    tool: self.program,
                }
                .into());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to execute {}", self.program));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            debug!(
                target: "tool",
                "{} exited with {:?}",
                self.program,
                output.status.code()
            );
            if !stderr.is_empty() {
                debug!(target: "tool", "stderr: {}", stderr.trim());
            }
        }

        Ok(ToolOutput {
            stdout,
            stderr,
            success: output.status.success(),
            exit_code: output.status.code(),
        })
    }

    /// Execute the command and require a successful exit.
    ///
    /// # Errors
    ///
    /// In addition to [`execute`](Self::execute)'s errors, returns
    /// [`BowerflatError::InstallFailed`] when the tool exits non-zero.
    pub async fn execute_success(self) -> Result<()> {
        let program = self.program.clone();
        let output = self.execute().await?;
        if !output.success {
            return Err(BowerflatError::InstallFailed {
                tool: program,
                exit_code: output.exit_code.unwrap_or(-1),
            }
            .into());
        }
        Ok(())
    }
}

/// Output from an external tool command.
#[derive(Debug)]
pub struct ToolOutput {
    /// Captured standard output (empty when stdio was inherited)
    pub stdout: String,
    /// Captured standard error (empty when stdio was inherited)
    pub stderr: String,
    /// Whether the tool exited successfully
    pub success: bool,
    /// The tool's exit code, if it exited normally
    pub exit_code: Option<i32>,
}

/// Run `npm install` in the directory containing a `package.json`.
///
/// No output verification is performed beyond the exit status.
pub async fn npm_install(descriptor_dir: &Path) -> Result<()> {
    ToolCommand::new(NPM)
        .arg("install")
        .current_dir(descriptor_dir)
        .inherit_stdio()
        .execute_success()
        .await
}

/// Run the default grunt task in the directory containing a `Gruntfile.js`.
pub async fn grunt_default(descriptor_dir: &Path) -> Result<()> {
    ToolCommand::new(GRUNT)
        .current_dir(descriptor_dir)
        .inherit_stdio()
        .execute_success()
        .await
}

/// Run `bower install` for the given `bower.json`, staging into `dest_dir`.
///
/// Verifies that bower is runnable first, in order to give a good error
/// message when it is not installed. The probe is separate from the install
/// call so installation-related errors are never reported as a missing tool.
///
/// # Errors
///
/// - [`BowerflatError::ToolMissing`] if the bower binary cannot be located
/// - [`BowerflatError::ToolProbeFailed`] if `bower --version` itself fails
/// - [`BowerflatError::InstallFailed`] if the install exits non-zero
pub async fn bower_install(descriptor_path: &Path, dest_dir: &Path) -> Result<()> {
    if !command_exists(BOWER) {
        return Err(BowerflatError::ToolMissing {
            tool: BOWER.to_string(),
        }
        .into());
    }

    let probe = ToolCommand::new(BOWER).arg("--version").execute().await?;
    if !probe.success {
        return Err(BowerflatError::ToolProbeFailed {
            tool: BOWER.to_string(),
            stderr: probe.stderr.trim().to_string(),
        }
        .into());
    }
    println!("Bower {}", probe.stdout.trim());

    // bower's own working directory is set via --config.cwd, matching its
    // invocation contract; ours stays untouched
    ToolCommand::new(BOWER)
        .arg("install")
        .arg(descriptor_path.display().to_string())
        .arg("--verbose")
        .arg(format!("--config.cwd={}", dest_dir.display()))
        .arg("-p")
        .inherit_stdio()
        .execute_success()
        .await
}
