//! Configuration management for pkgctl.
//!
//! pkgctl keeps a single user-wide file, `~/.pkgctl/config.toml`, holding
//! the package server address, a default namespace and the local repository
//! registry. See [`global`] for the format.
//!
//! # Resolution Order
//!
//! | Setting   | Sources, highest precedence first                              |
//! |-----------|----------------------------------------------------------------|
//! | file      | `--config`, `PKGCTL_CONFIG`, `~/.pkgctl/config.toml`           |
//! | server    | `--server`, `PKGCTL_SERVER`, `server` in the file              |
//! | namespace | `--namespace`/`-n`, `namespace` in the file, `default`         |

pub mod global;

pub use global::{GlobalConfig, Repository};
