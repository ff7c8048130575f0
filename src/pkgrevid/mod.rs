//! Package and package revision identifiers.
//!
//! A package revision is addressed by five dot-separated segments:
//!
//! ```text
//! <target>.<repository>.<realm>.<package>.<workspace>
//! ```
//!
//! and a bare package by three: `<repository>.<realm>.<package>`. The
//! revision label is never part of the dotted name. It travels separately
//! (a `--revision` flag or an `@<revision>` suffix) and an absent revision
//! means "the current head of the workspace".
//!
//! # Examples
//!
//! ```rust
//! use pkgctl::pkgrevid::{PackageRevisionId, parse_package_revision};
//!
//! let id = parse_package_revision("catalog.repo-a.infra.workload.ws1").unwrap();
//! assert_eq!(id.repository, "repo-a");
//! assert_eq!(id.to_string(), "catalog.repo-a.infra.workload.ws1");
//! assert!(id.revision.is_none());
//!
//! let pinned = PackageRevisionId::parse_ref("catalog.repo-a.infra.workload.ws1@v3").unwrap();
//! assert_eq!(pinned.revision.as_deref(), Some("v3"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::PkgctlError;

/// Segment count of a package revision name.
pub const PACKAGE_REVISION_SEGMENTS: usize = 5;

/// Segment count of a bare package name.
pub const PACKAGE_SEGMENTS: usize = 3;

const SEPARATOR: char = '.';
const REVISION_SEPARATOR: char = '@';

const PACKAGE_REVISION_FIELDS: [&str; PACKAGE_REVISION_SEGMENTS] =
    ["target", "repository", "realm", "package", "workspace"];
const PACKAGE_FIELDS: [&str; PACKAGE_SEGMENTS] = ["repository", "realm", "package"];

/// Coordinates of a package, independent of workspace and revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageId {
    /// Optional scope of the repository; absent in the three-segment form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub repository: String,
    pub realm: String,
    pub package: String,
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(target) = &self.target {
            write!(f, "{target}{SEPARATOR}")?;
        }
        write!(f, "{}{SEPARATOR}{}{SEPARATOR}{}", self.repository, self.realm, self.package)
    }
}

impl FromStr for PackageId {
    type Err = PkgctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_package(s)
    }
}

/// Coordinates of one package revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRevisionId {
    pub target: String,
    pub repository: String,
    pub realm: String,
    pub package: String,
    pub workspace: String,
    /// Version label; `None` resolves to the head of the workspace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl PackageRevisionId {
    /// Parse `<name>[@<revision>]`.
    ///
    /// The part before `@` must be a valid five-segment name; the revision,
    /// when the separator is present, must be non-empty.
    pub fn parse_ref(reference: &str) -> Result<Self, PkgctlError> {
        match reference.split_once(REVISION_SEPARATOR) {
            None => parse_package_revision(reference),
            Some((name, revision)) => {
                let mut id = parse_package_revision(name)?;
                if revision.is_empty() {
                    return Err(PkgctlError::InvalidSegment {
                        name: reference.to_string(),
                        segment: "revision",
                        value: String::new(),
                        reason: "must not be empty".to_string(),
                    });
                }
                validate_segment(reference, "revision", revision)?;
                id.revision = Some(revision.to_string());
                Ok(id)
            }
        }
    }

    /// Replace the revision label, e.g. with a `--revision` flag value.
    #[must_use]
    pub fn with_revision(mut self, revision: Option<String>) -> Self {
        self.revision = revision;
        self
    }

    /// True when no revision is pinned and the workspace head is meant.
    #[must_use]
    pub fn resolves_to_head(&self) -> bool {
        self.revision.is_none()
    }

    /// The package coordinates, keeping the target.
    #[must_use]
    pub fn package_id(&self) -> PackageId {
        PackageId {
            target: Some(self.target.clone()),
            repository: self.repository.clone(),
            realm: self.realm.clone(),
            package: self.package.clone(),
        }
    }

    /// The five-segment name followed by `@<revision>` when one is pinned.
    #[must_use]
    pub fn to_ref_string(&self) -> String {
        match &self.revision {
            Some(revision) => format!("{self}{REVISION_SEPARATOR}{revision}"),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for PackageRevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_package_revision(self))
    }
}

impl FromStr for PackageRevisionId {
    type Err = PkgctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_package_revision(s)
    }
}

/// Lineage pointer recorded on a cloned revision.
///
/// Copied coordinates of the source at clone time; later changes to the
/// source do not propagate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upstream {
    pub repository: String,
    pub realm: String,
    pub package: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl From<&PackageRevisionId> for Upstream {
    fn from(id: &PackageRevisionId) -> Self {
        Self {
            repository: id.repository.clone(),
            realm: id.realm.clone(),
            package: id.package.clone(),
            revision: id.revision.clone(),
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}{SEPARATOR}{}", self.repository, self.realm, self.package)?;
        if let Some(revision) = &self.revision {
            write!(f, "{REVISION_SEPARATOR}{revision}")?;
        }
        Ok(())
    }
}

/// Parse a five-segment package revision name.
///
/// Fails with [`PkgctlError::MalformedIdentifier`] when the segment count is
/// not five and with [`PkgctlError::InvalidSegment`] naming the first bad
/// segment otherwise. The returned id never carries a revision.
pub fn parse_package_revision(name: &str) -> Result<PackageRevisionId, PkgctlError> {
    let segments = split_segments(name, &PACKAGE_REVISION_FIELDS)?;
    let [target, repository, realm, package, workspace] = segments;
    Ok(PackageRevisionId {
        target,
        repository,
        realm,
        package,
        workspace,
        revision: None,
    })
}

/// Format a package revision id as its five-segment name.
///
/// Left inverse of [`parse_package_revision`]; the revision is not included.
#[must_use]
pub fn format_package_revision(id: &PackageRevisionId) -> String {
    [
        id.target.as_str(),
        id.repository.as_str(),
        id.realm.as_str(),
        id.package.as_str(),
        id.workspace.as_str(),
    ]
    .join(".")
}

/// Parse a three-segment `<repository>.<realm>.<package>` name.
pub fn parse_package(name: &str) -> Result<PackageId, PkgctlError> {
    let [repository, realm, package] = split_segments(name, &PACKAGE_FIELDS)?;
    Ok(PackageId {
        target: None,
        repository,
        realm,
        package,
    })
}

fn split_segments<const N: usize>(
    name: &str,
    fields: &[&'static str; N],
) -> Result<[String; N], PkgctlError> {
    let parts: Vec<&str> = name.split(SEPARATOR).collect();
    if parts.len() != N {
        return Err(PkgctlError::MalformedIdentifier {
            name: name.to_string(),
            expected: N,
            actual: parts.len(),
        });
    }

    for (field, value) in fields.iter().zip(&parts) {
        validate_segment(name, field, value)?;
    }

    Ok(std::array::from_fn(|i| parts[i].to_string()))
}

fn validate_segment(name: &str, segment: &'static str, value: &str) -> Result<(), PkgctlError> {
    let invalid = |reason: String| PkgctlError::InvalidSegment {
        name: name.to_string(),
        segment,
        value: value.to_string(),
        reason,
    };

    if value.is_empty() {
        return Err(invalid("must not be empty".to_string()));
    }
    if let Some(c) = value.chars().find(|c| !is_segment_char(*c)) {
        return Err(invalid(format!("contains invalid character '{c}'")));
    }
    Ok(())
}

const fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_')
}
