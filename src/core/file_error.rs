//! File operation context for I/O errors.
//!
//! Local filesystem failures surface as [`PkgctlError::IoFailure`] carrying the
//! operation that failed and the offending path. The [`FileResultExt`] trait
//! attaches that context at the call site:
//!
//! ```rust,no_run
//! use pkgctl::core::file_error::{FileOperation, FileResultExt};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), pkgctl::core::PkgctlError> {
//! let path = Path::new("package/Kptfile");
//! let content = std::fs::read_to_string(path).with_file_context(FileOperation::Read, path)?;
//! # let _ = content;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::error::PkgctlError;

/// The kind of filesystem operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Write,
    Metadata,
    CreateDir,
    Walk,
    Rename,
    Stage,
    Backup,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Metadata => write!(f, "getting metadata of"),
            FileOperation::CreateDir => write!(f, "creating directory"),
            FileOperation::Walk => write!(f, "walking"),
            FileOperation::Rename => write!(f, "moving into place"),
            FileOperation::Stage => write!(f, "staging"),
            FileOperation::Backup => write!(f, "setting aside"),
        }
    }
}

/// Attach a [`FileOperation`] and path to an I/O result.
pub trait FileResultExt<T> {
    /// Convert the I/O error into [`PkgctlError::IoFailure`] naming `path`.
    fn with_file_context(
        self,
        operation: FileOperation,
        path: impl Into<PathBuf>,
    ) -> Result<T, PkgctlError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        path: impl Into<PathBuf>,
    ) -> Result<T, PkgctlError> {
        self.map_err(|source| PkgctlError::IoFailure {
            operation,
            path: path.into(),
            source: Arc::new(source),
        })
    }
}

impl<T> FileResultExt<T> for Result<T, walkdir::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        path: impl Into<PathBuf>,
    ) -> Result<T, PkgctlError> {
        self.map_err(|error| {
            // Prefer the entry walkdir was looking at over the walk root.
            let path = error.path().map_or_else(|| path.into(), std::path::Path::to_path_buf);
            PkgctlError::IoFailure {
                operation,
                path,
                source: Arc::new(std::io::Error::from(error)),
            }
        })
    }
}
