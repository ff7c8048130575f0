//! Utility modules for pkgctl.

pub mod fs;

pub use fs::{create_missing_dirs, ensure_dir};
