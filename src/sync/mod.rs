//! Package revision operations against a [`PackageStore`].
//!
//! [`PackageRevisionClient`] binds a store to a namespace and exposes the
//! operations the CLI offers: get, list, create, clone, delete, lifecycle
//! updates, push and pull. Each call is a short request/response exchange;
//! no state is kept between calls apart from the store handle.
//!
//! # Push and pull
//!
//! Push replaces the remote content of a draft revision wholesale with a
//! local [`ResourceSet`](crate::resources::ResourceSet). Pull fetches the remote content completely before
//! anything local changes. Both accept a [`CancellationToken`]; cancelling
//! before the final remote update leaves the remote untouched.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pkgctl::client::MemoryStore;
//! use pkgctl::sync::PackageRevisionClient;
//!
//! # async fn example() -> Result<(), pkgctl::core::PkgctlError> {
//! let client = PackageRevisionClient::new(Arc::new(MemoryStore::new()), "default");
//! let created = client.create("catalog.repo-a.infra.workload.ws1").await?;
//! println!("{}", created.metadata.name);
//! # Ok(())
//! # }
//! ```

mod pull;
mod push;

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::{Lifecycle, ObjectKey, PackageRevision};
use crate::client::PackageStore;
use crate::core::PkgctlError;
use crate::lineage::{build_clone, new_package_revision, parse_target};
use crate::pkgrevid::{PackageRevisionId, parse_package_revision};

/// Package revision operations scoped to one namespace.
#[derive(Clone)]
pub struct PackageRevisionClient {
    store: Arc<dyn PackageStore>,
    namespace: String,
}

impl std::fmt::Debug for PackageRevisionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageRevisionClient").field("namespace", &self.namespace).finish()
    }
}

impl PackageRevisionClient {
    pub fn new(store: Arc<dyn PackageStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn key(&self, id: &PackageRevisionId) -> ObjectKey {
        ObjectKey::new(&self.namespace, id.to_string())
    }

    /// Fetch one revision by `<name>[@<revision>]`.
    ///
    /// A pinned revision must match the revision the server reports for the
    /// object, otherwise the lookup is a [`PkgctlError::NotFound`].
    pub async fn get(&self, reference: &str) -> Result<PackageRevision, PkgctlError> {
        let id = PackageRevisionId::parse_ref(reference)?;
        let revision = self.store.get_package_revision(&self.key(&id)).await?;
        if !revision_matches(&id, &revision.spec.package_rev_id) {
            return Err(PkgctlError::not_found(
                &revision.kind,
                &self.namespace,
                id.to_ref_string(),
            ));
        }
        Ok(revision)
    }

    /// All revisions in the namespace, ordered by name.
    pub async fn list(&self) -> Result<Vec<PackageRevision>, PkgctlError> {
        self.store.list_package_revisions(&self.namespace).await
    }

    /// Create an empty draft revision.
    pub async fn create(&self, name: &str) -> Result<PackageRevision, PkgctlError> {
        let id = parse_package_revision(name)?;
        let created =
            self.store.create_package_revision(new_package_revision(&id, &self.namespace)).await?;
        info!("Created package revision {}", created.key());
        Ok(created)
    }

    /// Create a draft revision `target` whose upstream is `source`.
    ///
    /// `source` may carry an `@<revision>` suffix; `revision` overrides it
    /// when given. The target is validated before the source is looked up.
    pub async fn clone_revision(
        &self,
        target: &str,
        source: &str,
        revision: Option<String>,
    ) -> Result<PackageRevision, PkgctlError> {
        let target_id = parse_target(target)?;
        let mut source_id = PackageRevisionId::parse_ref(source)?;
        if revision.is_some() {
            source_id = source_id.with_revision(revision);
        }

        let source_revision = match self.store.get_package_revision(&self.key(&source_id)).await {
            Ok(found) => found,
            Err(e) if e.is_not_found() => {
                return Err(PkgctlError::SourceNotFound {
                    name: source_id.to_ref_string(),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };
        if !revision_matches(&source_id, &source_revision.spec.package_rev_id) {
            return Err(PkgctlError::SourceNotFound {
                name: source_id.to_ref_string(),
                reason: format!(
                    "current revision is {}",
                    source_revision.spec.package_rev_id.revision.as_deref().unwrap_or("unset")
                ),
            });
        }

        // The upstream records the revision the user asked for
        let mut pinned_source = source_revision;
        if source_id.revision.is_some() {
            pinned_source.spec.package_rev_id.revision.clone_from(&source_id.revision);
        }

        let clone = build_clone(&target_id, &self.namespace, &pinned_source);
        let created = self.store.create_package_revision(clone).await?;
        info!("Cloned {} from {}", created.key(), source_id.to_ref_string());
        Ok(created)
    }

    /// Delete a revision and its content.
    pub async fn delete(&self, name: &str) -> Result<(), PkgctlError> {
        let id = parse_package_revision(name)?;
        let key = self.key(&id);
        self.store.delete_package_revision(&key).await?;
        info!("Deleted package revision {}", key);
        Ok(())
    }

    /// Move a revision to `lifecycle`.
    ///
    /// Requesting the current state returns the revision unchanged without
    /// writing. Backward or skipping transitions are refused locally.
    pub async fn update_status(
        &self,
        name: &str,
        lifecycle: Lifecycle,
    ) -> Result<PackageRevision, PkgctlError> {
        let id = parse_package_revision(name)?;
        let mut revision = self.store.get_package_revision(&self.key(&id)).await?;
        let current = revision.lifecycle();

        if current == lifecycle {
            debug!("{} is already {}", revision.key(), lifecycle);
            return Ok(revision);
        }
        if !current.can_transition_to(lifecycle) {
            return Err(PkgctlError::InvalidLifecycleTransition {
                name: id.to_string(),
                from: current,
                to: lifecycle,
            });
        }

        revision.spec.lifecycle = lifecycle;
        let updated = self.store.update_package_revision(revision).await?;
        info!("Moved {} from {} to {}", updated.key(), current, lifecycle);
        Ok(updated)
    }
}

/// True when `requested` pins no revision or the same one as `actual`.
fn revision_matches(requested: &PackageRevisionId, actual: &PackageRevisionId) -> bool {
    requested.revision.is_none() || requested.revision == actual.revision
}

/// Run `future` unless `cancel` fires first.
async fn until_cancelled<T, F>(
    cancel: &CancellationToken,
    operation: impl Into<String>,
    future: F,
) -> Result<T, PkgctlError>
where
    F: Future<Output = Result<T, PkgctlError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(PkgctlError::Cancelled { operation: operation.into() }),
        result = future => result,
    }
}

/// Run blocking filesystem work off the async runtime.
async fn run_blocking<T, F>(operation: String, work: F) -> Result<T, PkgctlError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, PkgctlError> + Send + 'static,
{
    match tokio::task::spawn_blocking(work).await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(_) => Err(PkgctlError::Cancelled {
            operation,
        }),
    }
}

/// Abort with [`PkgctlError::Cancelled`] if `cancel` has fired.
fn check_cancelled(cancel: &CancellationToken, operation: &str) -> Result<(), PkgctlError> {
    if cancel.is_cancelled() {
        return Err(PkgctlError::Cancelled {
            operation: operation.to_string(),
        });
    }
    Ok(())
}
