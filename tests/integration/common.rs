//! Shared helpers for the integration suite.

// Not every helper is used by every test module
#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch area with its own configuration file.
pub struct TestProject {
    _temp: TempDir,
    root: PathBuf,
    config_path: PathBuf,
}

impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let root = temp.path().to_path_buf();
        Self {
            config_path: root.join("home").join(".pkgctl").join("config.toml"),
            root,
            _temp: temp,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn write_config(&self, content: &str) {
        fs::create_dir_all(self.config_path.parent().expect("config parent"))
            .expect("create config dir");
        fs::write(&self.config_path, content).expect("write config");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(&self.config_path).expect("read config")
    }

    /// The `pkgctl` binary pointed at this project's configuration, with no
    /// server inherited from the environment and colours off.
    pub fn pkgctl(&self) -> Command {
        let mut cmd = Command::cargo_bin("pkgctl").expect("pkgctl binary");
        cmd.current_dir(&self.root)
            .env("PKGCTL_CONFIG", &self.config_path)
            .env_remove("PKGCTL_SERVER")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

/// Sorted list of regular files under `root`, relative and `/`-separated.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .expect("entry under root")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
