//! Access to the package server's object store.
//!
//! [`PackageStore`] is the seam between the sync operations and the server.
//! Two implementations ship with the crate:
//!
//! - [`HttpStore`] talks JSON to a package server over HTTP.
//! - [`MemoryStore`] keeps everything in process, for tests and embedding.
//!
//! Both enforce the same contract: lookups that miss fail with
//! [`PkgctlError::NotFound`], colliding creates with
//! [`PkgctlError::AlreadyExists`], and updates carrying a stale
//! `resource_version` with [`PkgctlError::Conflict`]. Nothing is retried.

mod http;
mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::api::{ObjectKey, PackageRevision, PackageRevisionResources};
use crate::core::PkgctlError;

/// Typed Get/List/Create/Update/Delete over the two package kinds.
///
/// A `PackageRevisionResources` object exists exactly as long as the
/// `PackageRevision` of the same name; it is created and deleted along with
/// it and can only be read and updated directly.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PackageStore: Send + Sync {
    async fn get_package_revision(&self, key: &ObjectKey) -> Result<PackageRevision, PkgctlError>;

    /// All revisions in `namespace`, ordered by name.
    async fn list_package_revisions(
        &self,
        namespace: &str,
    ) -> Result<Vec<PackageRevision>, PkgctlError>;

    async fn create_package_revision(
        &self,
        revision: PackageRevision,
    ) -> Result<PackageRevision, PkgctlError>;

    async fn update_package_revision(
        &self,
        revision: PackageRevision,
    ) -> Result<PackageRevision, PkgctlError>;

    async fn delete_package_revision(&self, key: &ObjectKey) -> Result<(), PkgctlError>;

    async fn get_package_revision_resources(
        &self,
        key: &ObjectKey,
    ) -> Result<PackageRevisionResources, PkgctlError>;

    async fn update_package_revision_resources(
        &self,
        resources: PackageRevisionResources,
    ) -> Result<PackageRevisionResources, PkgctlError>;
}
