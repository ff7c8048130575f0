//! Filesystem helpers shared by directory materialisation and config saving.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::file_error::{FileOperation, FileResultExt};
use crate::core::PkgctlError;

/// Create `path` and its parents if missing.
///
/// Fails if `path` exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<(), PkgctlError> {
    if !path.exists() {
        fs::create_dir_all(path).with_file_context(FileOperation::CreateDir, path)?;
    } else if !path.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "path exists but is not a directory",
        ))
        .with_file_context(FileOperation::CreateDir, path);
    }
    Ok(())
}

/// Create `path` and any missing ancestors one level at a time.
///
/// Every directory that did not exist before is appended to `created`,
/// outermost first, so a caller can remove them again. This holds on failure
/// too: levels created before the error are still recorded.
pub fn create_missing_dirs(path: &Path, created: &mut Vec<PathBuf>) -> Result<(), PkgctlError> {
    let missing: Vec<&Path> = path
        .ancestors()
        .take_while(|dir| !dir.as_os_str().is_empty() && fs::symlink_metadata(dir).is_err())
        .collect();

    for dir in missing.into_iter().rev() {
        fs::create_dir(dir).with_file_context(FileOperation::CreateDir, dir)?;
        created.push(dir.to_path_buf());
    }
    Ok(())
}

/// Directory next to `path` where staging directories can be created.
///
/// A relative single-component path stages in the current directory.
#[must_use]
pub fn sibling_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// True if `path` is a regular file whose bytes equal `content`.
///
/// Unreadable or missing files compare unequal.
#[must_use]
pub fn file_has_content(path: &Path, content: &[u8]) -> bool {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_file() && metadata.len() == content.len() as u64 => {
            fs::read(path).is_ok_and(|existing| existing == content)
        }
        _ => false,
    }
}
