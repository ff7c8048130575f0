//! User-wide configuration and the local repository registry.
//!
//! The configuration lives in `~/.pkgctl/config.toml` (overridable with
//! `--config` or `PKGCTL_CONFIG`) and is loaded once at process start. It is
//! then handed to commands by reference; nothing reads it through a global.
//!
//! # File Format
//!
//! ```toml
//! server = "https://pkgserver.example.com"
//! namespace = "team-a"
//!
//! [repos.catalog]
//! url = "https://github.com/example/catalog.git"
//! secret = "git-credentials"
//! deployment = false
//! directory = "packages"
//! ```
//!
//! # Security
//!
//! Repository entries may name credentials, so the file is written with
//! `0600` permissions on Unix.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_NAMESPACE};
use crate::core::{FileOperation, FileResultExt, PkgctlError};

/// Connection coordinates of a registered repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Clone URL of the backing repository
    pub url: String,

    /// Name of the secret holding credentials for `url`, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Whether the repository holds deployable packages
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deployment: bool,

    /// Sub-directory of the repository that holds packages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl Repository {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret: None,
            deployment: false,
            directory: None,
        }
    }
}

/// Global pkgctl configuration.
///
/// # Examples
///
/// ```rust
/// use pkgctl::config::{GlobalConfig, Repository};
///
/// let mut config = GlobalConfig::default();
/// config.add_repository("catalog", Repository::new("https://github.com/example/catalog.git"));
/// assert!(config.get_repository("catalog").is_some());
///
/// config.remove_repository("catalog").unwrap();
/// assert!(config.remove_repository("catalog").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Base URL of the package server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Namespace used when `--namespace` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Registered repositories keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub repos: BTreeMap<String, Repository>,
}

impl GlobalConfig {
    /// Load from `path` if given, otherwise from [`default_path`](Self::default_path).
    ///
    /// A missing file yields the default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = Self::resolve_path(path)?;
        if fs::try_exists(&path).await.unwrap_or(false) {
            Self::load_from(&path).await
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).await.with_file_context(FileOperation::Read, path)?;

        toml::from_str(&content).map_err(|e| {
            anyhow::Error::new(PkgctlError::ConfigurationError {
                message: format!("{}: {}", path.display(), e.message()),
            })
        })
    }

    /// Write to `path`, creating parent directories, with owner-only
    /// permissions on Unix.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(path)
                .await
                .with_context(|| format!("Failed to read permissions for {}", path.display()))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).await.with_context(|| {
                format!("Failed to set permissions on {}", path.display())
            })?;
        }

        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// `~/.pkgctl/config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| PkgctlError::ConfigurationError {
            message: "Unable to determine home directory".to_string(),
        })?;
        Ok(home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// The explicit path with `~` and variables expanded, or the default.
    ///
    /// # Errors
    ///
    /// Returns an error if expansion fails or no default can be determined.
    pub fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf> {
        match path {
            Some(path) => {
                let raw = path.to_string_lossy();
                let expanded = shellexpand::full(&raw).map_err(|e| {
                    PkgctlError::ConfigurationError {
                        message: format!("Cannot expand config path '{raw}': {e}"),
                    }
                })?;
                Ok(PathBuf::from(expanded.as_ref()))
            }
            None => Self::default_path(),
        }
    }

    /// Register `name`, replacing any existing entry. Returns the replaced
    /// entry.
    pub fn add_repository(
        &mut self,
        name: impl Into<String>,
        repository: Repository,
    ) -> Option<Repository> {
        self.repos.insert(name.into(), repository)
    }

    /// Unregister `name`.
    ///
    /// # Errors
    ///
    /// [`PkgctlError::RepositoryNotFound`] if no such entry exists; the
    /// configuration is unchanged in that case.
    pub fn remove_repository(&mut self, name: &str) -> Result<Repository, PkgctlError> {
        self.repos.remove(name).ok_or_else(|| PkgctlError::RepositoryNotFound {
            name: name.to_string(),
        })
    }

    #[must_use]
    pub fn get_repository(&self, name: &str) -> Option<&Repository> {
        self.repos.get(name)
    }

    /// Registered names in sorted order.
    pub fn repository_names(&self) -> impl Iterator<Item = &str> {
        self.repos.keys().map(String::as_str)
    }

    /// Namespace to use: `flag`, then the configured one, then `"default"`.
    #[must_use]
    pub fn resolve_namespace(&self, flag: Option<&str>) -> String {
        flag.or(self.namespace.as_deref()).unwrap_or(DEFAULT_NAMESPACE).to_string()
    }

    /// Server to use: `flag`, then the configured one.
    #[must_use]
    pub fn resolve_server(&self, flag: Option<&str>) -> Option<String> {
        flag.or(self.server.as_deref()).map(str::to_string)
    }
}
