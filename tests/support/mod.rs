//! Test support utilities for caisson integration tests.
//!
//! Provides an isolated test environment and helper commands.

use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

/// Test environment with an isolated temp directory.
///
/// No process-global state is mutated — child processes use `.current_dir()`
/// so tests can safely run in parallel. Vault environment variables are
/// cleared per command so tests never talk to a real Vault.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create a test environment with the state file initialized.
    pub fn init() -> Self {
        let t = Self::new();
        let output = t.run(&["init"]);
        assert!(
            output.status.success(),
            "failed to initialize state: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Create a caisson command with a clean environment.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("caisson").expect("failed to find caisson binary");
        cmd.current_dir(self.dir.path());
        cmd.env_remove("VAULT_ADDR");
        cmd.env_remove("VAULT_TOKEN");
        cmd.env_remove("CAISSON_STATE");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    /// Run caisson with the given arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run caisson")
    }

    /// Overwrite the state file with raw TOML.
    pub fn write_state(&self, contents: &str) {
        std::fs::write(self.dir.path().join(".caisson.toml"), contents)
            .expect("failed to write state file");
    }

    /// Read the state file back as a string.
    pub fn read_state(&self) -> String {
        std::fs::read_to_string(self.dir.path().join(".caisson.toml"))
            .expect("failed to read state file")
    }
}
