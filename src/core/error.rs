//! Error handling for bowerflat
//!
//! This module provides the error types and user-friendly error reporting for
//! the install/flatten pipeline. The error system is designed around two core
//! principles:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`BowerflatError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! # Exit Codes
//!
//! Errors carry their process exit code via [`BowerflatError::exit_code`]:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success, including the "nothing to flatten" outcome |
//! | 1 | A required tool binary was not found, or any other failure |
//! | 2 | The tool's version probe command ran but failed |
//!
//! Use [`user_friendly_error`] to convert any error into a displayable format
//! with contextual suggestions.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for bowerflat operations.
///
/// Each variant represents a specific failure mode and includes the details
/// needed to explain it to the user (tool names, file paths, exit statuses).
///
/// # Error Categories
///
/// ## External Tools
/// - [`ToolMissing`](Self::ToolMissing) - tool binary not found in PATH
/// - [`ToolProbeFailed`](Self::ToolProbeFailed) - the `--version` probe ran but errored
/// - [`InstallFailed`](Self::InstallFailed) - an install invocation exited non-zero
///
/// ## Descriptors and Flattening
/// - [`DescriptorParseError`](Self::DescriptorParseError) - malformed `bower.json`
/// - [`InvalidMainPattern`](Self::InvalidMainPattern) - unparseable glob in a `main` field
/// - [`MissingVersion`](Self::MissingVersion) - version-tagged output requested
///   for a component that declares no version
///
/// ## Configuration
/// - [`SettingsNotFound`](Self::SettingsNotFound) - explicit settings path missing
/// - [`SettingsParseError`](Self::SettingsParseError) - invalid TOML syntax
/// - [`ConfigError`](Self::ConfigError) - semantically invalid configuration
#[derive(Error, Debug)]
pub enum BowerflatError {
    /// Required tool binary not found in PATH.
    ///
    /// Raised before any install attempt when the tool cannot be located,
    /// so installation-related errors are never mistaken for a missing tool.
    #[error("'{tool}' is not installed or not found in PATH")]
    ToolMissing {
        /// Name of the missing tool binary
        tool: String,
    },

    /// The tool's version probe command ran but exited with an error.
    ///
    /// Distinct from [`ToolMissing`](Self::ToolMissing): the binary exists
    /// but is not in working order.
    #[error("checking the {tool} version failed")]
    ToolProbeFailed {
        /// Name of the tool whose probe failed
        tool: String,
        /// Error output captured from the probe command
        stderr: String,
    },

    /// An external install command exited with a non-zero status.
    #[error("{tool} exited with status {exit_code}")]
    InstallFailed {
        /// Name of the tool that failed
        tool: String,
        /// The tool's exit code (-1 if terminated by a signal)
        exit_code: i32,
    },

    /// A component descriptor file is not valid JSON.
    #[error("invalid descriptor file {file}")]
    DescriptorParseError {
        /// Path to the descriptor file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// A `main` entry is not a valid glob pattern.
    #[error("invalid main pattern '{pattern}' for component '{component}'")]
    InvalidMainPattern {
        /// The unparseable glob pattern
        pattern: String,
        /// Name of the component declaring the pattern
        component: String,
    },

    /// Version-tagged output was requested for a component without a version.
    #[error("component '{component}' declares no version, required for version-tagged output")]
    MissingVersion {
        /// Name of the component lacking a `version` field
        component: String,
    },

    /// Settings file explicitly given on the command line does not exist.
    #[error("settings file not found: {path}")]
    SettingsNotFound {
        /// The path that was given
        path: String,
    },

    /// Settings file parsing error.
    #[error("invalid settings file syntax in {file}")]
    SettingsParseError {
        /// Path to the settings file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Other error.
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl BowerflatError {
    /// Process exit code for this error.
    ///
    /// Tool availability failures get distinct codes so callers (CI scripts,
    /// Makefiles) can tell "install bower" apart from "bower is broken".
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ToolMissing {
                ..
            } => 1,
            Self::ToolProbeFailed {
                ..
            } => 2,
            _ => 1,
        }
    }
}

/// User-facing wrapper around a [`BowerflatError`].
///
/// Adds an optional actionable suggestion (displayed green) and explanatory
/// details (displayed yellow) to the underlying error (displayed red).
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying bowerflat error
    pub error: BowerflatError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: BowerflatError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Process exit code for the wrapped error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }

    /// Display the error context to stderr with terminal colors.
    ///
    /// This is the primary way bowerflat presents errors to users in the CLI.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\ndetails: {details}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nsuggestion: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with helpful suggestions.
///
/// Typed [`BowerflatError`]s get variant-specific suggestions; everything
/// else falls back to a generic context that preserves the error chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    match error.downcast::<BowerflatError>() {
        Ok(bowerflat_error) => create_error_context(bowerflat_error),
        Err(other) => {
            // Keep the cause chain visible; anyhow's Display only shows the
            // outermost context.
            let mut message = other.to_string();
            for cause in other.chain().skip(1) {
                message.push_str(&format!("\n  caused by: {cause}"));
            }
            ErrorContext::new(BowerflatError::Other {
                message,
            })
        }
    }
}

fn create_error_context(error: BowerflatError) -> ErrorContext {
    match &error {
        BowerflatError::ToolMissing {
            tool,
        } => {
            let suggestion = match tool.as_str() {
                "bower" => "Install bower with 'npm install -g bower'",
                "npm" => "Install Node.js (which provides npm) from https://nodejs.org/",
                "grunt" => "Install grunt with 'npm install -g grunt-cli'",
                _ => "Install the tool and ensure it is in your PATH",
            };
            ErrorContext::new(error).with_suggestion(suggestion).with_details(
                "Bowerflat delegates dependency installation to external tools \
                 and cannot proceed without them",
            )
        }
        BowerflatError::ToolProbeFailed {
            stderr, ..
        } => {
            let details = if stderr.is_empty() {
                None
            } else {
                Some(stderr.clone())
            };
            let ctx = ErrorContext::new(error)
                .with_suggestion("Run the tool's --version command manually to diagnose");
            match details {
                Some(d) => ctx.with_details(d),
                None => ctx,
            }
        }
        BowerflatError::InstallFailed {
            tool, ..
        } => {
            let suggestion = format!("Re-run with --verbose to see the full {tool} output");
            ErrorContext::new(error).with_suggestion(suggestion)
        }
        BowerflatError::DescriptorParseError {
            reason, ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check that the descriptor file is valid JSON")
                .with_details(details)
        }
        BowerflatError::MissingVersion {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Add a \"version\" field to the component's bower.json, or drop --version-tagged",
        ),
        BowerflatError::SettingsNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the path passed via --config, or omit it to use defaults"),
        BowerflatError::SettingsParseError {
            reason, ..
        } => {
            let details = reason.clone();
            ErrorContext::new(error)
                .with_suggestion("Check the TOML syntax in your bowerflat.toml")
                .with_details(details)
        }
        _ => ErrorContext::new(error),
    }
}
