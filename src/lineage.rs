//! Construction of new package revision objects.
//!
//! Nothing here talks to the server: these functions only build the object
//! that will be submitted. Resolving the clone source and submitting the
//! result happen in [`crate::sync`].

use tracing::debug;

use crate::api::{Lifecycle, ObjectMeta, PackageRevision, PackageRevisionSpec, Task, TaskType};
use crate::core::PkgctlError;
use crate::pkgrevid::{PackageRevisionId, Upstream, parse_package_revision};

/// Build an empty draft revision named after `target`.
#[must_use]
pub fn new_package_revision(target: &PackageRevisionId, namespace: &str) -> PackageRevision {
    draft(target, namespace, None, TaskType::Init)
}

/// Build a draft revision named after `target` that records `source` as its
/// upstream.
///
/// The upstream holds the source's own coordinates, copied at this moment.
/// Content is not copied; the server populates it when it processes the
/// clone task.
#[must_use]
pub fn build_clone(
    target: &PackageRevisionId,
    namespace: &str,
    source: &PackageRevision,
) -> PackageRevision {
    let upstream = Upstream::from(&source.spec.package_rev_id);
    debug!("Cloning {} from upstream {}", target, upstream);
    draft(target, namespace, Some(upstream), TaskType::Clone)
}

/// Parse a clone target, mapping identifier errors to
/// [`PkgctlError::InvalidTarget`].
pub fn parse_target(target: &str) -> Result<PackageRevisionId, PkgctlError> {
    parse_package_revision(target).map_err(|e| PkgctlError::InvalidTarget {
        name: target.to_string(),
        source: Box::new(e),
    })
}

fn draft(
    target: &PackageRevisionId,
    namespace: &str,
    upstream: Option<Upstream>,
    task: TaskType,
) -> PackageRevision {
    // Revision labels are assigned by the server on publish
    let id = target.clone().with_revision(None);
    PackageRevision::new(
        ObjectMeta::new(id.to_string(), namespace),
        PackageRevisionSpec {
            package_rev_id: id,
            lifecycle: Lifecycle::Draft,
            upstream,
            tasks: vec![Task::new(task)],
        },
    )
}
