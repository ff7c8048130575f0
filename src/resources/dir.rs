//! Directory tree <-> [`ResourceSet`] conversion.
//!
//! Both functions are blocking and are expected to run on a blocking thread
//! (`tokio::task::spawn_blocking`) when called from async code.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::ResourceSet;
use crate::constants::STAGING_PREFIX;
use crate::core::file_error::{FileOperation, FileResultExt};
use crate::core::PkgctlError;
use crate::utils::fs::{create_missing_dirs, ensure_dir, file_has_content, sibling_dir};

/// Outcome of [`write_directory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Files created or overwritten
    pub written: usize,
    /// Files that already had the requested content
    pub unchanged: usize,
}

/// Read every regular file under `root` into a [`ResourceSet`].
///
/// Symlinks, devices, sockets and other non-regular entries are skipped.
/// Keys are relative to `root` with `/` separators. Contents are read
/// eagerly; the first unreadable file aborts the whole read.
pub fn read_directory(root: &Path, cancel: &CancellationToken) -> Result<ResourceSet, PkgctlError> {
    let metadata = fs::metadata(root).with_file_context(FileOperation::Metadata, root)?;
    if !metadata.is_dir() {
        return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"))
            .with_file_context(FileOperation::Walk, root);
    }

    let mut resources = ResourceSet::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        if cancel.is_cancelled() {
            return Err(PkgctlError::Cancelled {
                operation: format!("reading {}", root.display()),
            });
        }

        let entry = entry.with_file_context(FileOperation::Walk, root)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let key = resource_key(root, entry.path())?;
        let content =
            fs::read_to_string(entry.path()).with_file_context(FileOperation::Read, entry.path())?;
        resources.insert(key, content)?;
    }

    debug!("Read {} resources from {}", resources.len(), root.display());
    Ok(resources)
}

/// Materialise `resources` under `root`.
///
/// The write is all or nothing. The layout is checked against what is on
/// disk first, then every file that needs writing is staged in a temporary
/// directory next to `root`. Only then are files moved into place, and if a
/// move fails every change made so far is undone.
///
/// Files whose content already matches are left untouched, so writing the
/// same set twice is a no-op. Files under `root` that are not in `resources`
/// are kept.
pub fn write_directory(
    root: &Path,
    resources: &ResourceSet,
    cancel: &CancellationToken,
) -> Result<WriteSummary, PkgctlError> {
    check_layout(root, resources)?;

    let mut summary = WriteSummary::default();
    let mut pending: Vec<(PathBuf, PathBuf)> = Vec::new();

    let staging_parent = sibling_dir(root);
    ensure_dir(&staging_parent)?;
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(&staging_parent)
        .with_file_context(FileOperation::Stage, &staging_parent)?;

    for (index, (key, content)) in resources.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(PkgctlError::Cancelled {
                operation: format!("writing {}", root.display()),
            });
        }

        let target = root.join(key);
        if file_has_content(&target, content.as_bytes()) {
            summary.unchanged += 1;
            continue;
        }

        // Flat numbering keeps staged names independent of key depth
        let staged = staging.path().join(index.to_string());
        fs::write(&staged, content).with_file_context(FileOperation::Stage, &staged)?;
        pending.push((staged, target));
    }

    let mut placement = Placement::default();
    for (staged, target) in &pending {
        let backup = staged.with_extension("orig");
        if let Err(error) = placement.place(staged, target, backup) {
            warn!("Writing {} failed, restoring previous contents", root.display());
            placement.rollback();
            return Err(error);
        }
    }
    summary.written = pending.len();

    debug!(
        "Wrote {} resources to {} ({} unchanged)",
        summary.written,
        root.display(),
        summary.unchanged
    );
    Ok(summary)
}

/// Refuse a set that cannot be laid out under `root` before anything moves.
///
/// Directories needed by a key must not be files, on disk or in the set.
/// A file must not land where a directory already exists.
fn check_layout(root: &Path, resources: &ResourceSet) -> Result<(), PkgctlError> {
    if fs::symlink_metadata(root).is_ok() {
        require_directory(root)?;
    }

    for key in resources.paths() {
        for (end, _) in key.match_indices('/') {
            let dir = &key[..end];
            if resources.contains(dir) {
                return Err(PkgctlError::InvalidResourcePath {
                    path: key.to_string(),
                    reason: format!("'{dir}' is also a file in the set"),
                });
            }
            let path = root.join(dir);
            if fs::symlink_metadata(&path).is_ok() {
                require_directory(&path)?;
            }
        }

        let target = root.join(key);
        if fs::symlink_metadata(&target).is_ok_and(|metadata| metadata.is_dir()) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "a directory is in the way",
            ))
            .with_file_context(FileOperation::Write, &target);
        }
    }
    Ok(())
}

fn require_directory(path: &Path) -> Result<(), PkgctlError> {
    let metadata = fs::metadata(path).with_file_context(FileOperation::Metadata, path)?;
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(std::io::Error::new(std::io::ErrorKind::AlreadyExists, "not a directory"))
            .with_file_context(FileOperation::CreateDir, path)
    }
}

/// Changes made under the destination so far, undone in reverse order.
#[derive(Default)]
struct Placement {
    created_dirs: Vec<PathBuf>,
    /// Moved-in targets with the backup of the file they replaced, if any
    placed: Vec<(PathBuf, Option<PathBuf>)>,
}

impl Placement {
    fn place(&mut self, staged: &Path, target: &Path, backup: PathBuf) -> Result<(), PkgctlError> {
        if let Some(parent) = target.parent() {
            create_missing_dirs(parent, &mut self.created_dirs)?;
        }

        let backup = if fs::symlink_metadata(target).is_ok() {
            fs::rename(target, &backup).with_file_context(FileOperation::Backup, target)?;
            Some(backup)
        } else {
            None
        };

        if let Err(error) = fs::rename(staged, target) {
            if let Some(backup) = &backup {
                restore(backup, target);
            }
            return Err(error).with_file_context(FileOperation::Rename, target);
        }
        self.placed.push((target.to_path_buf(), backup));
        Ok(())
    }

    fn rollback(self) {
        for (target, backup) in self.placed.into_iter().rev() {
            match backup {
                Some(backup) => restore(&backup, &target),
                None => {
                    if let Err(e) = fs::remove_file(&target) {
                        warn!("Could not remove {}: {e}", target.display());
                    }
                }
            }
        }
        for dir in self.created_dirs.into_iter().rev() {
            if let Err(e) = fs::remove_dir(&dir) {
                warn!("Could not remove directory {}: {e}", dir.display());
            }
        }
    }
}

fn restore(backup: &Path, target: &Path) {
    if let Err(e) = fs::rename(backup, target) {
        warn!("Could not restore {} from {}: {e}", target.display(), backup.display());
    }
}

fn resource_key(root: &Path, path: &Path) -> Result<String, PkgctlError> {
    let relative = path.strip_prefix(root).map_err(|_| PkgctlError::InvalidResourcePath {
        path: path.display().to_string(),
        reason: format!("not inside {}", root.display()),
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                segments.push(segment.to_str().ok_or_else(|| PkgctlError::InvalidResourcePath {
                    path: relative.display().to_string(),
                    reason: "path is not valid UTF-8".to_string(),
                })?);
            }
            _ => {
                return Err(PkgctlError::InvalidResourcePath {
                    path: relative.display().to_string(),
                    reason: "unexpected path component".to_string(),
                });
            }
        }
    }
    Ok(segments.join("/"))
}
