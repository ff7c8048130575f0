//! Shared state and helpers for CLI commands.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{HttpStore, PackageStore};
use crate::config::GlobalConfig;
use crate::core::PkgctlError;
use crate::sync::PackageRevisionClient;

/// Everything a command needs, resolved once from flags and the config file.
pub struct CommandContext {
    /// Loaded configuration
    pub config: GlobalConfig,
    /// Where `config` was loaded from and is saved to
    pub config_path: PathBuf,
    /// Namespace for package revision operations
    pub namespace: String,
    /// Package server base URL, if one is configured
    pub server: Option<String>,
    /// Fired on Ctrl-C
    pub cancel: CancellationToken,
    store: Option<Arc<dyn PackageStore>>,
}

impl CommandContext {
    pub fn new(
        config: GlobalConfig,
        config_path: PathBuf,
        namespace: String,
        server: Option<String>,
    ) -> Self {
        Self {
            config,
            config_path,
            namespace,
            server,
            cancel: CancellationToken::new(),
            store: None,
        }
    }

    /// Use `store` instead of connecting to `server`.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn PackageStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// A client bound to the resolved namespace.
    ///
    /// # Errors
    ///
    /// Fails when no store was injected and no server is configured.
    pub fn client(&self) -> Result<PackageRevisionClient> {
        let store: Arc<dyn PackageStore> = match (&self.store, &self.server) {
            (Some(store), _) => Arc::clone(store),
            (None, Some(server)) => {
                debug!("Using package server {}", server);
                Arc::new(HttpStore::new(server.as_str())?)
            }
            (None, None) => {
                return Err(PkgctlError::ConfigurationError {
                    message: "no package server configured".to_string(),
                }
                .into());
            }
        };
        Ok(PackageRevisionClient::new(store, self.namespace.clone()))
    }

    /// Persist `config` to [`config_path`](Self::config_path).
    pub async fn save_config(&self) -> Result<()> {
        self.config
            .save_to(&self.config_path)
            .await
            .with_context(|| format!("Failed to update {}", self.config_path.display()))
    }

    /// Cancel the context's token when the process receives Ctrl-C.
    pub fn cancel_on_ctrl_c(&self) {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupted, cancelling");
                cancel.cancel();
            }
        });
    }
}

/// Output format for commands that print objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns
    #[default]
    Table,
    /// YAML documents
    Yaml,
    /// Pretty-printed JSON
    Json,
}
