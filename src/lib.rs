//! Bowerflat - front-end dependency installer and component flattener
//!
//! Bowerflat prepares front-end static assets for deployment in three phases:
//!
//! 1. **Discovery**: descriptor files (`package.json`, `Gruntfile.js`,
//!    `bower.json`) are located across the configured search roots.
//! 2. **Installation**: the matching external tools (`npm`, `grunt`, `bower`)
//!    are invoked sequentially, staging bower's output into a temp directory.
//! 3. **Flattening**: each installed component's declared "main" entry files
//!    are copied into a single flat `components/` tree, preferring minified
//!    variants and skipping files whose content is already up to date.
//!
//! # Architecture Overview
//!
//! - `bowerflat.toml` configures search roots, the staging directory, and the
//!   output layout
//! - Dependency resolution is entirely delegated to the external package
//!   managers; bowerflat only drives their invocation and consumes the staged
//!   result
//! - Flattening is idempotent: re-running with unchanged inputs performs zero
//!   filesystem writes thanks to content-hash deduplication
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface (`install`, `flatten`)
//! - [`config`] - `bowerflat.toml` settings and defaults
//! - [`core`] - Error types, exit-code mapping, and user-facing error display
//! - [`descriptor`] - `bower.json` parsing and the run-scoped descriptor cache
//! - [`discovery`] - Descriptor file enumeration across search roots
//! - [`flatten`] - The flattening engine (glob expansion, minified-variant
//!   preference, checksum deduplication)
//! - [`pipeline`] - The install pipeline driver
//! - [`tool`] - External tool invocation (`npm`, `grunt`, `bower`)
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Run the full pipeline: install everything, then flatten
//! bowerflat install
//!
//! # Isolate each component's output by its declared version
//! bowerflat install --version-tagged
//!
//! # Re-flatten an existing staging directory without reinstalling
//! bowerflat flatten --staging-dir .tmp
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod descriptor;
pub mod discovery;
pub mod flatten;
pub mod pipeline;
pub mod tool;
