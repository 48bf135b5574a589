//! Common test utilities for saltsolo integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A scratch directory holding config files, sources and a sandbox
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub path: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the workspace, returning its absolute path
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Write `salt.yml` and return its path
    pub fn write_config(&self, yaml: &str) -> PathBuf {
        self.write_file("salt.yml", yaml)
    }

    /// Sandbox directory used by `sandbox --sandbox`
    pub fn sandbox(&self) -> PathBuf {
        self.path.join("sandbox")
    }

    #[allow(dead_code)]
    pub fn read_sandbox_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.sandbox().join(path)).expect("Failed to read file")
    }

    #[allow(dead_code)]
    pub fn sandbox_file_exists(&self, path: &str) -> bool {
        self.sandbox().join(path).exists()
    }
}

/// The saltsolo binary with logging left at its default
#[allow(deprecated)]
pub fn saltsolo_cmd() -> Command {
    let mut cmd = Command::cargo_bin("saltsolo").expect("saltsolo binary");
    cmd.env_remove("RUST_LOG").env_remove("SALTSOLO_CONFIG");
    cmd
}
