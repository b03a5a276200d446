//! Shared fixtures for integration tests.
//!
//! Each test gets an isolated temporary working directory; the bowerflat
//! binary is always invoked with that directory as its cwd so relative
//! settings (staging dir, output root) resolve inside the sandbox.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnvironment {
    temp: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().expect("failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// A bowerflat command running inside the sandbox directory.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("bowerflat").expect("bowerflat binary not built");
        cmd.current_dir(self.temp.path());
        cmd
    }

    /// Write a file relative to the sandbox root, creating parent dirs.
    pub fn write_file(&self, relative: impl AsRef<Path>, content: &str) -> PathBuf {
        let path = self.temp.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a `bowerflat.toml` at the sandbox root.
    pub fn write_settings(&self, content: &str) {
        self.write_file("bowerflat.toml", content);
    }

    /// Stage a component under `.tmp/bower_components/<name>` with the given
    /// `bower.json` content.
    pub fn add_component(&self, name: &str, descriptor: &str) {
        self.write_file(format!(".tmp/bower_components/{name}/bower.json"), descriptor);
    }

    /// Write a file inside a staged component's directory.
    pub fn add_component_file(&self, name: &str, relative: &str, content: &str) {
        self.write_file(format!(".tmp/bower_components/{name}/{relative}"), content);
    }

    /// Read a file in the default output tree (`static/components/...`).
    pub fn read_output(&self, relative: &str) -> String {
        fs::read_to_string(self.output_path(relative)).unwrap()
    }

    pub fn output_path(&self, relative: &str) -> PathBuf {
        self.temp.path().join("static/components").join(relative)
    }
}
