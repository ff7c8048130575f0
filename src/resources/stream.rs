//! YAML stream <-> [`ResourceSet`] conversion.
//!
//! A stream is zero or more YAML documents separated by `---`. Each document
//! is filed under a path taken from, in order:
//!
//! 1. the `internal.config.kubernetes.io/path` annotation (stripped from the
//!    stored content),
//! 2. `<kind>-<metadata.name>.yaml`, lower-cased,
//! 3. `stdin-<index>.yaml`.
//!
//! Documents sharing a path are joined with `---` in input order. Files that
//! are not YAML travel as `RawFile` wrapper documents and are unwrapped
//! verbatim.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::io::{Read, Write};

use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::ResourceSet;
use crate::constants::{PATH_ANNOTATION, RAW_FILE_API_VERSION, RAW_FILE_KIND, STREAM_CHUNK_SIZE};
use crate::core::file_error::{FileOperation, FileResultExt};
use crate::core::PkgctlError;

const DOCUMENT_SEPARATOR: &str = "---\n";

/// Parse a resource stream read from `reader`.
///
/// `origin` names the stream in errors (e.g. `"stdin"`).
pub fn read_stream<R: Read>(
    mut reader: R,
    origin: &str,
    cancel: &CancellationToken,
) -> Result<ResourceSet, PkgctlError> {
    let input = read_all(&mut reader, origin, cancel)?;

    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (index, document) in serde_yaml::Deserializer::from_str(&input).enumerate() {
        if cancel.is_cancelled() {
            return Err(cancelled(origin));
        }

        let value = Value::deserialize(document).map_err(|e| PkgctlError::InvalidStream {
            origin: origin.to_string(),
            reason: format!("document {index}: {e}"),
        })?;
        if value.is_null() {
            continue;
        }

        let (path, content) = resource_from_document(value, index, origin)?;
        grouped.entry(path).or_default().push(content);
    }

    let resources = ResourceSet::from_entries(
        grouped.into_iter().map(|(path, documents)| (path, documents.join(DOCUMENT_SEPARATOR))),
    )?;
    debug!("Parsed {} resources from {}", resources.len(), origin);
    Ok(resources)
}

/// Serialise `resources` as a single YAML stream.
///
/// YAML files are emitted document by document with their path annotation;
/// anything else is wrapped in a `RawFile` document.
pub fn write_stream<W: Write>(mut writer: W, resources: &ResourceSet) -> Result<(), PkgctlError> {
    let mut first = true;
    for (path, content) in resources.iter() {
        for document in documents_for(path, content)? {
            let text = serde_yaml::to_string(&document).map_err(|e| PkgctlError::InvalidStream {
                origin: path.to_string(),
                reason: e.to_string(),
            })?;
            if !first {
                writer
                    .write_all(DOCUMENT_SEPARATOR.as_bytes())
                    .with_file_context(FileOperation::Write, "<stream>")?;
            }
            writer.write_all(text.as_bytes()).with_file_context(FileOperation::Write, "<stream>")?;
            first = false;
        }
    }
    writer.flush().with_file_context(FileOperation::Write, "<stream>")
}

fn read_all<R: Read>(
    reader: &mut R,
    origin: &str,
    cancel: &CancellationToken,
) -> Result<String, PkgctlError> {
    let mut bytes = Vec::new();
    let mut chunk = vec![0u8; STREAM_CHUNK_SIZE];
    loop {
        if cancel.is_cancelled() {
            return Err(cancelled(origin));
        }
        let n = reader.read(&mut chunk).with_file_context(FileOperation::Read, origin)?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8(bytes).map_err(|e| PkgctlError::InvalidStream {
        origin: origin.to_string(),
        reason: format!("not valid UTF-8: {e}"),
    })
}

fn resource_from_document(
    mut value: Value,
    index: usize,
    origin: &str,
) -> Result<(String, String), PkgctlError> {
    let annotated_path = take_path_annotation(&mut value);

    if is_raw_file(&value) {
        let path = annotated_path.or_else(|| metadata_name(&value)).ok_or_else(|| {
            PkgctlError::InvalidStream {
                origin: origin.to_string(),
                reason: format!("document {index}: {RAW_FILE_KIND} has no path"),
            }
        })?;
        let data = value.get("data").and_then(Value::as_str).ok_or_else(|| {
            PkgctlError::InvalidStream {
                origin: origin.to_string(),
                reason: format!("document {index}: {RAW_FILE_KIND} '{path}' has no string data"),
            }
        })?;
        return Ok((path, data.to_string()));
    }

    let path = annotated_path
        .or_else(|| derived_path(&value))
        .unwrap_or_else(|| format!("stdin-{index}.yaml"));
    let content = serde_yaml::to_string(&value).map_err(|e| PkgctlError::InvalidStream {
        origin: origin.to_string(),
        reason: format!("document {index}: {e}"),
    })?;
    Ok((path, content))
}

fn documents_for(path: &str, content: &str) -> Result<Vec<Value>, PkgctlError> {
    if is_yaml_path(path) {
        if let Some(mut documents) = parse_mappings(content) {
            for document in &mut documents {
                set_path_annotation(document, path);
            }
            return Ok(documents);
        }
    }
    Ok(vec![raw_file_document(path, content)])
}

/// All non-empty documents of `content`, if every one of them is a mapping.
fn parse_mappings(content: &str) -> Option<Vec<Value>> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        let value = Value::deserialize(document).ok()?;
        match value {
            Value::Null => {}
            Value::Mapping(_) => documents.push(value),
            _ => return None,
        }
    }
    if documents.is_empty() { None } else { Some(documents) }
}

fn raw_file_document(path: &str, content: &str) -> Value {
    let mut annotations = Mapping::new();
    annotations.insert(PATH_ANNOTATION.into(), path.into());

    let mut metadata = Mapping::new();
    metadata.insert("name".into(), path.into());
    metadata.insert("annotations".into(), Value::Mapping(annotations));

    let mut document = Mapping::new();
    document.insert("apiVersion".into(), RAW_FILE_API_VERSION.into());
    document.insert("kind".into(), RAW_FILE_KIND.into());
    document.insert("metadata".into(), Value::Mapping(metadata));
    document.insert("data".into(), content.into());
    Value::Mapping(document)
}

fn set_path_annotation(document: &mut Value, path: &str) {
    let Value::Mapping(root) = document else {
        return;
    };
    let metadata = root
        .entry("metadata".into())
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    let Value::Mapping(metadata) = metadata else {
        return;
    };
    let annotations = metadata
        .entry("annotations".into())
        .or_insert_with(|| Value::Mapping(Mapping::new()));
    if let Value::Mapping(annotations) = annotations {
        annotations.insert(PATH_ANNOTATION.into(), path.into());
    }
}

/// Remove the path annotation, dropping `annotations` and `metadata` if that
/// leaves them empty.
fn take_path_annotation(document: &mut Value) -> Option<String> {
    let Value::Mapping(root) = document else {
        return None;
    };
    let Some(Value::Mapping(metadata)) = root.get_mut("metadata") else {
        return None;
    };
    let Some(Value::Mapping(annotations)) = metadata.get_mut("annotations") else {
        return None;
    };

    let path = match annotations.remove(PATH_ANNOTATION) {
        Some(Value::String(path)) => path,
        _ => return None,
    };

    if annotations.is_empty() {
        metadata.remove("annotations");
    }
    if metadata.is_empty() {
        root.remove("metadata");
    }
    Some(path)
}

fn is_raw_file(value: &Value) -> bool {
    value.get("kind").and_then(Value::as_str) == Some(RAW_FILE_KIND)
        && value.get("apiVersion").and_then(Value::as_str) == Some(RAW_FILE_API_VERSION)
}

fn metadata_name(value: &Value) -> Option<String> {
    value.get("metadata")?.get("name")?.as_str().map(str::to_string)
}

fn derived_path(value: &Value) -> Option<String> {
    let kind = value.get("kind")?.as_str()?;
    let name = metadata_name(value)?;
    Some(format!("{kind}-{name}.yaml").to_lowercase())
}

fn is_yaml_path(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".yaml") || lower.ends_with(".yml")
}

fn cancelled(origin: &str) -> PkgctlError {
    PkgctlError::Cancelled {
        operation: format!("reading {origin}"),
    }
}
