//! pkgctl - command-line client for package revisions
//!
//! pkgctl talks to a package server that stores configuration packages as
//! versioned *package revisions*. Each revision has an identity, a lifecycle
//! state, optional lineage (the upstream it was cloned from) and content: a
//! set of text files keyed by relative path.
//!
//! # Architecture Overview
//!
//! Every remote object is a pair keyed by the same name:
//! - a `PackageRevision` carrying identity, lifecycle and lineage
//! - a `PackageRevisionResources` carrying the file content
//!
//! Local content moves in and out of the server wholesale. A push replaces
//! the entire content of a draft; a pull materialises the entire content of
//! a revision. Concurrent writers are detected through the server-assigned
//! resource version and reported as conflicts, never silently merged.
//!
//! # Core Modules
//!
//! ## Identity and content
//! - [`pkgrevid`] - Dotted package and package revision identifiers
//! - [`resources`] - [`resources::ResourceSet`] and its directory/stream codecs
//! - [`api`] - Wire shapes of the two remote object kinds and the lifecycle
//!
//! ## Remote operations
//! - [`client`] - The [`client::PackageStore`] abstraction with HTTP and in-memory stores
//! - [`lineage`] - Building new and cloned package revisions
//! - [`sync`] - Get, create, clone, delete, promote, push and pull
//!
//! ## Local state and the CLI
//! - [`config`] - `~/.pkgctl/config.toml`: server, namespace and repository registry
//! - [`cli`] - The `pkgctl` command tree
//! - [`core`] - Error taxonomy and user-facing error rendering
//! - [`utils`] - Filesystem helpers
//!
//! # Identifiers
//!
//! ```text
//! <target>.<repository>.<realm>.<package>.<workspace>[@<revision>]
//! ```
//!
//! The revision is optional everywhere; when absent the head of the
//! workspace is meant.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pkgctl::client::MemoryStore;
//! use pkgctl::resources::ResourceSet;
//! use pkgctl::sync::PackageRevisionClient;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PackageRevisionClient::new(Arc::new(MemoryStore::new()), "default");
//! let cancel = CancellationToken::new();
//!
//! client.create("catalog.repo-a.infra.workload.ws1").await?;
//!
//! let mut content = ResourceSet::new();
//! content.insert("Kptfile", "apiVersion: kpt.dev/v1\nkind: Kptfile\n")?;
//! client.push("catalog.repo-a.infra.workload.ws1", content, &cancel).await?;
//!
//! let pulled = client.pull("catalog.repo-a.infra.workload.ws1", &cancel).await?;
//! assert!(pulled.contains("Kptfile"));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod core;
pub mod lineage;
pub mod pkgrevid;
pub mod resources;
pub mod sync;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
