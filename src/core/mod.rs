//! Core types shared by every pkgctl module: the error taxonomy and the
//! file-operation context attached to local I/O failures.

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, PkgctlError, user_friendly_error};
pub use file_error::{FileOperation, FileResultExt};
