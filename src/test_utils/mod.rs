//! Test utilities for pkgctl
//!
//! Shared by the unit tests and, through the `test-utils` feature, by the
//! integration suite: logging setup, sample package content and a client
//! backed by an in-memory store.
//!
//! # Example
//!
//! ```rust,no_run
//! use pkgctl::test_utils::{memory_client, sample_resources};
//!
//! # async fn example() -> Result<(), pkgctl::core::PkgctlError> {
//! let (_store, client) = memory_client("default");
//! client.create("catalog.repo-a.infra.workload.ws1").await?;
//! assert_eq!(sample_resources().len(), 3);
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::sync::{Arc, Once};

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::client::MemoryStore;
use crate::resources::ResourceSet;
use crate::sync::PackageRevisionClient;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. `level` wins over `RUST_LOG`; with
/// neither set no subscriber is installed.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// A small package: a Kptfile, a nested manifest and a non-YAML file.
#[must_use]
pub fn sample_resources() -> ResourceSet {
    resources(&[
        ("Kptfile", "apiVersion: kpt.dev/v1\nkind: Kptfile\nmetadata:\n  name: workload\n"),
        (
            "manifests/deployment.yaml",
            "apiVersion: apps/v1\nkind: Deployment\nmetadata:\n  name: workload\nspec:\n  replicas: 2\n",
        ),
        ("README.md", "# workload\n"),
    ])
}

/// Build a [`ResourceSet`] from literal pairs.
///
/// # Panics
///
/// Panics if a path is not a valid resource path.
#[must_use]
pub fn resources(entries: &[(&str, &str)]) -> ResourceSet {
    ResourceSet::from_entries(entries.iter().copied()).expect("valid resource paths")
}

/// A fresh [`MemoryStore`] and a client bound to `namespace` on top of it.
#[must_use]
pub fn memory_client(namespace: &str) -> (Arc<MemoryStore>, PackageRevisionClient) {
    let store = Arc::new(MemoryStore::new());
    let client = PackageRevisionClient::new(store.clone(), namespace);
    (store, client)
}

/// Write `entries` below `root`, creating intermediate directories.
///
/// # Panics
///
/// Panics on any I/O failure.
pub fn write_tree(root: &Path, entries: &[(&str, &str)]) {
    for (path, content) in entries {
        let target = root.join(path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).expect("create parent directory");
        }
        std::fs::write(&target, content).expect("write test file");
    }
}
