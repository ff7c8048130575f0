use std::io::Read;
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{PackageRevisionClient, check_cancelled, run_blocking, until_cancelled};
use crate::api::PackageRevisionResources;
use crate::core::PkgctlError;
use crate::pkgrevid::parse_package_revision;
use crate::resources::{ResourceSet, read_directory, read_stream};

impl PackageRevisionClient {
    /// Replace the content of draft revision `name` with `resources`.
    ///
    /// Paths present remotely but missing from `resources` are dropped. The
    /// revision must exist and be a draft; both are checked before anything
    /// is written. The update carries the `resource_version` that was read,
    /// so a concurrent writer makes this fail with [`PkgctlError::Conflict`]
    /// instead of being silently overwritten.
    pub async fn push(
        &self,
        name: &str,
        resources: ResourceSet,
        cancel: &CancellationToken,
    ) -> Result<PackageRevisionResources, PkgctlError> {
        let id = parse_package_revision(name)?;
        let key = self.key(&id);
        let operation = format!("pushing {key}");

        let revision =
            until_cancelled(cancel, &operation, self.store.get_package_revision(&key)).await?;
        if !revision.lifecycle().is_mutable() {
            return Err(PkgctlError::LifecycleViolation {
                name: id.to_string(),
                lifecycle: revision.lifecycle(),
                operation: "push to".to_string(),
            });
        }

        let mut remote = until_cancelled(
            cancel,
            &operation,
            self.store.get_package_revision_resources(&key),
        )
        .await?;
        debug!(
            "Replacing {} resources of {} with {} ({} bytes)",
            remote.spec.resources.len(),
            key,
            resources.len(),
            resources.total_bytes()
        );

        remote.spec.resources = resources;
        // Last point at which cancelling leaves the remote untouched
        check_cancelled(cancel, &operation)?;
        let updated = self.store.update_package_revision_resources(remote).await?;
        info!("Pushed {} resources to {}", updated.spec.resources.len(), key);
        Ok(updated)
    }

    /// Read the directory tree at `dir` completely, then [`push`](Self::push) it.
    pub async fn push_directory(
        &self,
        name: &str,
        dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<PackageRevisionResources, PkgctlError> {
        // Validate the name before walking a possibly large tree
        parse_package_revision(name)?;
        let root: PathBuf = dir.to_path_buf();
        let token = cancel.clone();
        let resources =
            run_blocking(format!("reading {}", dir.display()), move || read_directory(&root, &token))
                .await?;
        self.push(name, resources, cancel).await
    }

    /// Parse a YAML document stream from `reader` completely, then
    /// [`push`](Self::push) it.
    pub async fn push_stream<R>(
        &self,
        name: &str,
        reader: R,
        origin: &str,
        cancel: &CancellationToken,
    ) -> Result<PackageRevisionResources, PkgctlError>
    where
        R: Read + Send + 'static,
    {
        parse_package_revision(name)?;
        let origin_name = origin.to_string();
        let token = cancel.clone();
        let resources = run_blocking(format!("reading {origin}"), move || {
            read_stream(reader, &origin_name, &token)
        })
        .await?;
        self.push(name, resources, cancel).await
    }
}
