//! Common test utilities and fixtures
//!
//! This module provides shared test infrastructure

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Get the valid config fixture path
pub fn valid_config_fixture() -> PathBuf {
    fixture_path("valid_config.toml")
}

/// Get the invalid config fixture path
pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

/// Environment variables that would leak the developer's setup into a test
const ENV_OVERRIDES: &[&str] = &[
    "WEDDING_RSVP_CONFIG",
    "WEDDING_RSVP_TITLE",
    "WEDDING_RSVP_DATA_DIR",
    "WEDDING_RSVP_STORAGE_KEY",
    "WEDDING_RSVP_BACKEND",
    "WEDDING_RSVP_BACKEND_URL",
    "WEDDING_RSVP_API_KEY",
    "WEDDING_RSVP_TABLE",
    "WEDDING_RSVP_TIMEOUT_SECS",
    "WEDDING_RSVP_LOG_LEVEL",
    "WEDDING_RSVP_LOG_FILE",
    "WEDDING_RSVP_LOG_JSON",
    "RUST_LOG",
];

/// Isolated home, data directory and config file for one test
pub struct TestEnvironment {
    pub root: TempDir,
    pub config_path: PathBuf,
    pub data_dir: PathBuf,
}

impl TestEnvironment {
    /// Environment with a file backend under a temporary data directory
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory");
        let data_dir = root.path().join("data");
        let config_path = root.path().join("config.toml");

        let config = format!(
            r#"
[site]
data_dir = "{}"

[backend]
kind = "file"
table = "rsvp_responses"
"#,
            data_dir.display()
        );
        fs::write(&config_path, config).expect("Failed to write config");

        Self {
            root,
            config_path,
            data_dir,
        }
    }

    /// Replace the config file content
    pub fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).expect("Failed to write custom config");
    }

    pub fn config(&self) -> &str {
        self.config_path.to_str().expect("temp path is UTF-8")
    }

    /// Binary without any config or environment from the host
    pub fn bare_cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("wedding-rsvp").expect("binary is built");
        for var in ENV_OVERRIDES {
            cmd.env_remove(var);
        }
        cmd.env("HOME", self.root.path())
            .env("XDG_CONFIG_HOME", self.root.path().join(".config"))
            .current_dir(self.root.path());
        cmd
    }

    /// Binary pointed at this environment's config
    pub fn cmd(&self) -> Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--config").arg(self.config());
        cmd
    }

    /// File the file backend appends to
    pub fn responses_path(&self) -> PathBuf {
        self.data_dir.join("rsvp_responses.jsonl")
    }

    /// Parsed lines of the responses file
    pub fn responses(&self) -> Vec<serde_json::Value> {
        read_json_lines(&self.responses_path())
    }

    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

pub fn read_json_lines(path: &Path) -> Vec<serde_json::Value> {
    match fs::read_to_string(path) {
        Ok(content) => content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).expect("valid JSON line"))
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_dir_exists() {
        assert!(fixtures_dir().exists(), "Fixtures directory should exist");
    }

    #[test]
    fn test_valid_config_exists() {
        assert!(
            valid_config_fixture().exists(),
            "Valid config fixture should exist"
        );
    }

    #[test]
    fn test_invalid_config_exists() {
        assert!(
            invalid_config_fixture().exists(),
            "Invalid config fixture should exist"
        );
    }
}
