use std::io::Write;
use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{PackageRevisionClient, revision_matches, run_blocking, until_cancelled};
use crate::core::PkgctlError;
use crate::pkgrevid::PackageRevisionId;
use crate::resources::{ResourceSet, WriteSummary, write_directory, write_stream};

impl PackageRevisionClient {
    /// Fetch the content of `<name>[@<revision>]`.
    pub async fn pull(
        &self,
        reference: &str,
        cancel: &CancellationToken,
    ) -> Result<ResourceSet, PkgctlError> {
        let id = PackageRevisionId::parse_ref(reference)?;
        let key = self.key(&id);

        let remote = until_cancelled(
            cancel,
            format!("pulling {key}"),
            self.store.get_package_revision_resources(&key),
        )
        .await?;
        if !revision_matches(&id, &remote.spec.package_rev_id) {
            return Err(PkgctlError::not_found(
                &remote.kind,
                &self.namespace,
                id.to_ref_string(),
            ));
        }
        Ok(remote.spec.resources)
    }

    /// Fetch the content of `reference` and materialise it under `dir`.
    ///
    /// The fetch completes before `dir` is touched, so a missing revision or
    /// a transport failure leaves the directory as it was.
    pub async fn pull_to_directory(
        &self,
        reference: &str,
        dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<WriteSummary, PkgctlError> {
        let resources = self.pull(reference, cancel).await?;
        let root = dir.to_path_buf();
        let token = cancel.clone();
        let summary = run_blocking(format!("writing {}", dir.display()), move || {
            write_directory(&root, &resources, &token)
        })
        .await?;
        info!(
            "Pulled {} into {} ({} written, {} unchanged)",
            reference,
            dir.display(),
            summary.written,
            summary.unchanged
        );
        Ok(summary)
    }

    /// Fetch the content of `reference` and write it to `writer` as a YAML
    /// stream.
    pub async fn pull_to_writer<W: Write>(
        &self,
        reference: &str,
        writer: W,
        cancel: &CancellationToken,
    ) -> Result<(), PkgctlError> {
        let resources = self.pull(reference, cancel).await?;
        write_stream(writer, &resources)
    }
}
