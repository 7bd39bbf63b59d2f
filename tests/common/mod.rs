//! Common test utilities for hygge integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/hygge/` directory or read their config.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// A test environment with isolated data and config.
///
/// The `hygge()` method returns a `Command` that sets `HYGGE_DATA_DIR` and
/// `HYGGE_CONFIG` per-invocation, making tests parallel-safe.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the hygge binary with isolated directories.
    pub fn hygge(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_hygge"));
        cmd.current_dir(self.data_dir.path());
        cmd.env("HYGGE_DATA_DIR", self.data_dir.path());
        cmd.env("HYGGE_CONFIG", self.config_path());
        cmd.env_remove("HYGGE_WEATHER_URL");
        cmd.env_remove("HYGGE_LOG");
        cmd
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().join("config.kdl")
    }

    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).unwrap();
    }

    /// Path of the persisted task list.
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.path().join("hygge-todos.json")
    }

    pub fn write_tasks(&self, json: &str) {
        std::fs::write(self.tasks_path(), json).unwrap();
    }

    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }

    /// Run a command and parse its JSON stdout.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.hygge().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "hygge {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    /// Add a task and return its id.
    pub fn add_task(&self, text: &str) -> String {
        let value = self.json(&["todo", "add", text]);
        value["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
