use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::PackageStore;
use crate::api::{ObjectKey, ObjectMeta, PackageRevision, PackageRevisionResources};
use crate::constants::{PACKAGE_REVISION_KIND, PACKAGE_REVISION_RESOURCES_KIND};
use crate::core::PkgctlError;
use crate::resources::ResourceSet;

#[derive(Debug, Default)]
struct State {
    revisions: BTreeMap<ObjectKey, PackageRevision>,
    resources: BTreeMap<ObjectKey, PackageRevisionResources>,
    last_version: u64,
}

impl State {
    fn next_version(&mut self) -> String {
        self.last_version += 1;
        self.last_version.to_string()
    }
}

/// In-process [`PackageStore`].
///
/// Behaves like the server for the parts the client relies on: names are
/// unique per namespace, every write bumps `resource_version`, and updates
/// sent with an outdated version are rejected.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of package revisions across all namespaces.
    pub async fn len(&self) -> usize {
        self.state.read().await.revisions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn check_version(
    kind: &str,
    stored: &ObjectMeta,
    incoming: &ObjectMeta,
) -> Result<(), PkgctlError> {
    match &incoming.resource_version {
        Some(version) if Some(version) != stored.resource_version.as_ref() => {
            Err(PkgctlError::Conflict {
                kind: kind.to_string(),
                namespace: stored.namespace.clone(),
                name: stored.name.clone(),
                reason: format!(
                    "resource version {version} is stale (current {})",
                    stored.resource_version.as_deref().unwrap_or("unknown")
                ),
            })
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl PackageStore for MemoryStore {
    async fn get_package_revision(&self, key: &ObjectKey) -> Result<PackageRevision, PkgctlError> {
        self.state.read().await.revisions.get(key).cloned().ok_or_else(|| {
            PkgctlError::not_found(PACKAGE_REVISION_KIND, &key.namespace, &key.name)
        })
    }

    async fn list_package_revisions(
        &self,
        namespace: &str,
    ) -> Result<Vec<PackageRevision>, PkgctlError> {
        let state = self.state.read().await;
        Ok(state.revisions.values().filter(|r| r.metadata.namespace == namespace).cloned().collect())
    }

    async fn create_package_revision(
        &self,
        mut revision: PackageRevision,
    ) -> Result<PackageRevision, PkgctlError> {
        let key = revision.key();
        let mut state = self.state.write().await;
        if state.revisions.contains_key(&key) {
            return Err(PkgctlError::AlreadyExists {
                kind: PACKAGE_REVISION_KIND.to_string(),
                namespace: key.namespace,
                name: key.name,
            });
        }

        let version = state.next_version();
        revision.metadata.uid = Some(Uuid::new_v4().to_string());
        revision.metadata.resource_version = Some(version.clone());
        revision.metadata.creation_timestamp = Some(Utc::now());

        let mut twin = PackageRevisionResources::new(
            revision.metadata.clone(),
            revision.spec.package_rev_id.clone(),
            ResourceSet::new(),
        );
        twin.metadata.resource_version = Some(version);

        debug!("Created {} in memory", key);
        state.resources.insert(key.clone(), twin);
        state.revisions.insert(key, revision.clone());
        Ok(revision)
    }

    async fn update_package_revision(
        &self,
        mut revision: PackageRevision,
    ) -> Result<PackageRevision, PkgctlError> {
        let key = revision.key();
        let mut state = self.state.write().await;
        let stored = state.revisions.get(&key).ok_or_else(|| {
            PkgctlError::not_found(PACKAGE_REVISION_KIND, &key.namespace, &key.name)
        })?;
        check_version(PACKAGE_REVISION_KIND, &stored.metadata, &revision.metadata)?;

        revision.metadata.uid.clone_from(&stored.metadata.uid);
        revision.metadata.creation_timestamp = stored.metadata.creation_timestamp;
        revision.metadata.resource_version = Some(state.next_version());
        state.revisions.insert(key, revision.clone());
        Ok(revision)
    }

    async fn delete_package_revision(&self, key: &ObjectKey) -> Result<(), PkgctlError> {
        let mut state = self.state.write().await;
        if state.revisions.remove(key).is_none() {
            return Err(PkgctlError::not_found(PACKAGE_REVISION_KIND, &key.namespace, &key.name));
        }
        state.resources.remove(key);
        debug!("Deleted {} from memory", key);
        Ok(())
    }

    async fn get_package_revision_resources(
        &self,
        key: &ObjectKey,
    ) -> Result<PackageRevisionResources, PkgctlError> {
        self.state.read().await.resources.get(key).cloned().ok_or_else(|| {
            PkgctlError::not_found(PACKAGE_REVISION_RESOURCES_KIND, &key.namespace, &key.name)
        })
    }

    async fn update_package_revision_resources(
        &self,
        mut resources: PackageRevisionResources,
    ) -> Result<PackageRevisionResources, PkgctlError> {
        let key = resources.key();
        let mut state = self.state.write().await;
        let stored = state.resources.get(&key).ok_or_else(|| {
            PkgctlError::not_found(PACKAGE_REVISION_RESOURCES_KIND, &key.namespace, &key.name)
        })?;
        check_version(PACKAGE_REVISION_RESOURCES_KIND, &stored.metadata, &resources.metadata)?;

        resources.metadata.uid.clone_from(&stored.metadata.uid);
        resources.metadata.creation_timestamp = stored.metadata.creation_timestamp;
        resources.metadata.resource_version = Some(state.next_version());
        state.resources.insert(key, resources.clone());
        Ok(resources)
    }
}
