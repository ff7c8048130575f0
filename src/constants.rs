//! Global constants used throughout the pkgctl codebase.
//!
//! Wire-level names (API group, kinds, annotations) live here so the
//! HTTP store, the resource stream codec and the tests agree on them.

/// Namespace used when neither `--namespace` nor the config file names one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// API group of the package server resources.
pub const API_GROUP: &str = "pkg.pkgserver.dev";

/// API version of the package server resources.
pub const API_VERSION: &str = "v1alpha1";

/// Kind of the identity + lifecycle + lineage resource.
pub const PACKAGE_REVISION_KIND: &str = "PackageRevision";

/// Kind of the identity + content resource.
pub const PACKAGE_REVISION_RESOURCES_KIND: &str = "PackageRevisionResources";

/// Annotation carrying a document's file path inside a resource stream.
///
/// Same key the kustomize/kpt tool chain uses, so streams produced by those
/// tools can be pushed unchanged.
pub const PATH_ANNOTATION: &str = "internal.config.kubernetes.io/path";

/// `apiVersion` of the wrapper document used for non-YAML files in a stream.
pub const RAW_FILE_API_VERSION: &str = "pkgctl.dev/v1alpha1";

/// `kind` of the wrapper document used for non-YAML files in a stream.
pub const RAW_FILE_KIND: &str = "RawFile";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "PKGCTL_CONFIG";

/// Environment variable overriding the package server URL.
pub const SERVER_ENV: &str = "PKGCTL_SERVER";

/// Directory under the home directory holding the config file.
pub const CONFIG_DIR_NAME: &str = ".pkgctl";

/// File name of the config file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Prefix of the staging directory used while materialising a pull.
pub const STAGING_PREFIX: &str = ".pkgctl-staging-";

/// Read buffer size for resource streams; cancellation is checked between chunks.
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;
