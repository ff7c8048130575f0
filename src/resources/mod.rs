//! Package revision content as a mapping from relative file path to text.
//!
//! A [`ResourceSet`] is built fresh from a directory ([`read_directory`]), a
//! YAML stream ([`read_stream`]) or a remote fetch, and written back out with
//! [`write_directory`] or [`write_stream`].
//!
//! Keys are normalised on insertion: `\` becomes `/`, a leading `./` is
//! dropped, and empty, `.` or `..` segments and absolute paths are rejected.
//! Iteration is in key order so serialisation is deterministic regardless of
//! how the set was assembled.

mod dir;
mod stream;

pub use dir::{WriteSummary, read_directory, write_directory};
pub use stream::{read_stream, write_stream};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::PkgctlError;

/// Ordered mapping from normalised relative path to file content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct ResourceSet {
    entries: BTreeMap<String, String>,
}

impl ResourceSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `content` at `path`, returning the previous content if any.
    pub fn insert(
        &mut self,
        path: impl AsRef<str>,
        content: impl Into<String>,
    ) -> Result<Option<String>, PkgctlError> {
        let key = normalize_resource_path(path.as_ref())?;
        Ok(self.entries.insert(key, content.into()))
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.entries.remove(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Total content size in bytes.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.entries.values().map(String::len).sum()
    }

    /// Build a set from `(path, content)` pairs, validating every path.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self, PkgctlError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (path, content) in entries {
            set.insert(path, content)?;
        }
        Ok(set)
    }
}

impl TryFrom<BTreeMap<String, String>> for ResourceSet {
    type Error = PkgctlError;

    fn try_from(entries: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<ResourceSet> for BTreeMap<String, String> {
    fn from(set: ResourceSet) -> Self {
        set.entries
    }
}

impl<'a> IntoIterator for &'a ResourceSet {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Normalise a raw resource path into a ResourceSet key.
pub fn normalize_resource_path(raw: &str) -> Result<String, PkgctlError> {
    let invalid = |reason: &str| PkgctlError::InvalidResourcePath {
        path: raw.to_string(),
        reason: reason.to_string(),
    };

    let unified = raw.replace('\\', "/");
    let mut trimmed = unified.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }

    if trimmed.is_empty() {
        return Err(invalid("path is empty"));
    }
    if trimmed.starts_with('/') || has_drive_prefix(trimmed) {
        return Err(invalid("path must be relative"));
    }

    for segment in trimmed.split('/') {
        match segment {
            "" => return Err(invalid("path contains an empty segment")),
            "." => return Err(invalid("path contains a '.' segment")),
            ".." => return Err(invalid("path must not contain '..'")),
            _ => {}
        }
    }

    Ok(trimmed.to_string())
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
