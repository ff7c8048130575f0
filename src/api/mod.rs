//! Wire types of the package server API.
//!
//! Two resource kinds are exchanged with the server, both keyed by
//! namespace + name where the name is the five-segment package revision
//! identifier:
//!
//! - [`PackageRevision`]: identity, lifecycle, lineage and task history.
//! - [`PackageRevisionResources`]: identity and the [`ResourceSet`] content.
//!
//! Field names follow the server's camelCase JSON.

mod lifecycle;

pub use lifecycle::Lifecycle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    API_GROUP, API_VERSION, PACKAGE_REVISION_KIND, PACKAGE_REVISION_RESOURCES_KIND,
};
use crate::pkgrevid::{PackageRevisionId, Upstream};
use crate::resources::ResourceSet;

/// `apiVersion` value of both resource kinds.
#[must_use]
pub fn api_version() -> String {
    format!("{API_GROUP}/{API_VERSION}")
}

/// Address of a remote object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Object metadata assigned partly by the client (name, namespace) and
/// partly by the server (uid, version, timestamp).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Opaque version used for optimistic concurrency on update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

impl ObjectMeta {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(&self.namespace, &self.name)
    }
}

/// Kind of a provenance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskType {
    /// Revision created empty
    Init,
    /// Revision derived from an upstream revision
    Clone,
    /// Revision derived from a newer upstream revision
    Update,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Clone => write!(f, "clone"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// One entry of a revision's provenance history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "type")]
    pub task_type: TaskType,
}

impl Task {
    #[must_use]
    pub const fn new(task_type: TaskType) -> Self {
        Self {
            task_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRevisionSpec {
    #[serde(rename = "packageRevID")]
    pub package_rev_id: PackageRevisionId,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Upstream>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,
}

/// Server-reported condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRevisionStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl PackageRevisionStatus {
    /// Status of the `Ready` condition, if reported.
    #[must_use]
    pub fn ready(&self) -> Option<&str> {
        self.conditions
            .iter()
            .find(|c| c.condition_type == "Ready")
            .map(|c| c.status.as_str())
    }
}

/// Identity, lifecycle and lineage of a package revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRevision {
    #[serde(default = "api_version")]
    pub api_version: String,
    #[serde(default = "package_revision_kind")]
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: PackageRevisionSpec,
    #[serde(default)]
    pub status: PackageRevisionStatus,
}

impl PackageRevision {
    pub fn new(metadata: ObjectMeta, spec: PackageRevisionSpec) -> Self {
        Self {
            api_version: api_version(),
            kind: package_revision_kind(),
            metadata,
            spec,
            status: PackageRevisionStatus::default(),
        }
    }

    #[must_use]
    pub fn key(&self) -> ObjectKey {
        self.metadata.key()
    }

    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.spec.lifecycle
    }

    /// Whether the revision was created by cloning another one.
    #[must_use]
    pub fn is_clone(&self) -> bool {
        self.spec.tasks.iter().any(|t| t.task_type == TaskType::Clone)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRevisionResourcesSpec {
    #[serde(rename = "packageRevID")]
    pub package_rev_id: PackageRevisionId,
    #[serde(default)]
    pub resources: ResourceSet,
}

/// Identity and content of a package revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRevisionResources {
    #[serde(default = "api_version")]
    pub api_version: String,
    #[serde(default = "package_revision_resources_kind")]
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: PackageRevisionResourcesSpec,
}

impl PackageRevisionResources {
    pub fn new(
        metadata: ObjectMeta,
        package_rev_id: PackageRevisionId,
        resources: ResourceSet,
    ) -> Self {
        Self {
            api_version: api_version(),
            kind: package_revision_resources_kind(),
            metadata,
            spec: PackageRevisionResourcesSpec {
                package_rev_id,
                resources,
            },
        }
    }

    #[must_use]
    pub fn key(&self) -> ObjectKey {
        self.metadata.key()
    }
}

fn package_revision_kind() -> String {
    PACKAGE_REVISION_KIND.to_string()
}

fn package_revision_resources_kind() -> String {
    PACKAGE_REVISION_RESOURCES_KIND.to_string()
}
