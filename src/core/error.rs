//! Error handling for pkgctl
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`PkgctlError`]) returned by the library so
//!    callers and tests can match on the failure category.
//! 2. **User-friendly messages** ([`ErrorContext`]) rendered by the CLI with
//!    details and an actionable suggestion.
//!
//! # Error Categories
//!
//! - **Input**: [`PkgctlError::MalformedIdentifier`], [`PkgctlError::InvalidSegment`],
//!   [`PkgctlError::InvalidTarget`], [`PkgctlError::InvalidResourcePath`],
//!   [`PkgctlError::InvalidStream`]. Local and never retryable.
//! - **Remote**: [`PkgctlError::NotFound`], [`PkgctlError::AlreadyExists`],
//!   [`PkgctlError::Conflict`], [`PkgctlError::SourceNotFound`],
//!   [`PkgctlError::Transport`]. Surfaced verbatim; nothing retries automatically.
//! - **Lifecycle**: [`PkgctlError::InvalidLifecycleTransition`],
//!   [`PkgctlError::LifecycleViolation`].
//! - **Local**: [`PkgctlError::IoFailure`], [`PkgctlError::ConfigurationError`],
//!   [`PkgctlError::RepositoryNotFound`], [`PkgctlError::Cancelled`].
//! - **Other**: [`PkgctlError::CommandFailed`] for untyped failures; keeps the
//!   top-level message and any context attached to it.
//!
//! Every variant names the identifier or path it is about.
//!
//! # Examples
//!
//! ```rust,no_run
//! use pkgctl::core::{PkgctlError, user_friendly_error};
//!
//! let error = PkgctlError::MalformedIdentifier {
//!     name: "catalog.repo".to_string(),
//!     expected: 5,
//!     actual: 2,
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::api::Lifecycle;
use crate::core::file_error::FileOperation;

/// The main error type for pkgctl operations.
///
/// Cloneable so results can be inspected and re-raised; I/O sources are
/// shared behind an [`Arc`].
#[derive(Error, Debug, Clone)]
pub enum PkgctlError {
    /// An identifier had the wrong number of dot-separated segments.
    #[error(
        "Malformed identifier '{name}': expected {expected} dot-separated segments, found {actual}"
    )]
    MalformedIdentifier {
        /// The identifier as given
        name: String,
        /// Segment count required by the identifier form
        expected: usize,
        /// Segment count actually found
        actual: usize,
    },

    /// One segment of an identifier is empty or contains forbidden characters.
    #[error("Malformed identifier '{name}': {segment} '{value}' {reason}")]
    InvalidSegment {
        /// The identifier as given
        name: String,
        /// Which segment is malformed (e.g. "repository", "workspace")
        segment: &'static str,
        /// The offending segment value
        value: String,
        /// What is wrong with it
        reason: String,
    },

    /// A remote object lookup missed.
    #[error("{kind} '{name}' not found in namespace '{namespace}'")]
    NotFound {
        /// Resource kind
        kind: String,
        /// Namespace of the lookup
        namespace: String,
        /// Object name
        name: String,
    },

    /// A create collided with an existing object.
    #[error("{kind} '{name}' already exists in namespace '{namespace}'")]
    AlreadyExists {
        /// Resource kind
        kind: String,
        /// Namespace of the object
        namespace: String,
        /// Object name
        name: String,
    },

    /// An update lost a race against a concurrent writer.
    #[error("{kind} '{name}' in namespace '{namespace}' was modified concurrently: {reason}")]
    Conflict {
        /// Resource kind
        kind: String,
        /// Namespace of the object
        namespace: String,
        /// Object name
        name: String,
        /// Server or store explanation
        reason: String,
    },

    /// The source of a clone could not be resolved.
    #[error("Clone source '{name}' could not be resolved: {reason}")]
    SourceNotFound {
        /// The source reference as given
        name: String,
        /// Why resolution failed
        reason: String,
    },

    /// The target of a clone is not a valid package revision identifier.
    #[error("Invalid clone target '{name}'")]
    InvalidTarget {
        /// The target as given
        name: String,
        /// The identifier parse failure
        #[source]
        source: Box<PkgctlError>,
    },

    /// A local filesystem operation failed.
    #[error("Failed {operation} '{}'", .path.display())]
    IoFailure {
        /// What was being done
        operation: FileOperation,
        /// The offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },

    /// A resource set key is not a valid relative path.
    #[error("Invalid resource path '{path}': {reason}")]
    InvalidResourcePath {
        /// The key as given
        path: String,
        /// What is wrong with it
        reason: String,
    },

    /// A resource stream could not be parsed.
    #[error("Invalid resource stream '{origin}': {reason}")]
    InvalidStream {
        /// Name of the stream (e.g. "stdin")
        origin: String,
        /// Parse failure
        reason: String,
    },

    /// The configuration file is unreadable or inconsistent.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the problem
        message: String,
    },

    /// A repository name is not present in the local registry.
    #[error("Repository '{name}' is not registered")]
    RepositoryNotFound {
        /// Repository name
        name: String,
    },

    /// A lifecycle change that only moves backwards or skips states.
    #[error("Cannot move package revision '{name}' from {from} to {to}")]
    InvalidLifecycleTransition {
        /// Package revision name
        name: String,
        /// Current lifecycle
        from: Lifecycle,
        /// Requested lifecycle
        to: Lifecycle,
    },

    /// An operation that needs a mutable revision was attempted on a frozen one.
    #[error("Cannot {operation} package revision '{name}': it is {lifecycle}, not draft")]
    LifecycleViolation {
        /// Package revision name
        name: String,
        /// Current lifecycle
        lifecycle: Lifecycle,
        /// The refused operation
        operation: String,
    },

    /// The package server could not be reached or answered unexpectedly.
    #[error("Request to {url} failed: {reason}")]
    Transport {
        /// Request URL
        url: String,
        /// Failure description
        reason: String,
    },

    /// The caller cancelled the operation.
    #[error("Cancelled while {operation}")]
    Cancelled {
        /// What was in progress
        operation: String,
    },

    /// A failure with no more specific category, e.g. a closed stdout.
    #[error("{message}")]
    CommandFailed {
        /// Top-level message, including any context naming the path or object
        message: String,
    },
}

impl PkgctlError {
    /// Build a [`PkgctlError::NotFound`] for `kind` at `namespace`/`name`.
    pub fn not_found(
        kind: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            kind: kind.into(),
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// True for remote lookup misses.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Error wrapper adding details and a suggestion for CLI display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: PkgctlError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub const fn new(error: PkgctlError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] for display.
///
/// Looks through the `anyhow` context chain for a [`PkgctlError`] so that
/// `.context(...)` added by commands does not hide the category. Errors with
/// no typed cause are shown with their full chain as details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(pkgctl_error) = error.chain().find_map(|e| e.downcast_ref::<PkgctlError>()) {
        let mut ctx = create_error_context(pkgctl_error.clone());
        let top = error.to_string();
        if ctx.details.is_none() && top != pkgctl_error.to_string() {
            ctx.details = Some(top);
        }
        return ctx;
    }

    let chain = error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>().join(": ");
    let ctx = ErrorContext::new(PkgctlError::CommandFailed {
        message: error.to_string(),
    });
    if chain.is_empty() {
        ctx
    } else {
        ctx.with_details(chain)
    }
}

fn create_error_context(error: PkgctlError) -> ErrorContext {
    match &error {
        PkgctlError::MalformedIdentifier {
            expected, ..
        } => {
            let form = if *expected == 5 {
                "<target>.<repository>.<realm>.<package>.<workspace>"
            } else {
                "<repository>.<realm>.<package>"
            };
            ErrorContext::new(error).with_suggestion(format!("Use the form {form}"))
        }
        PkgctlError::InvalidSegment {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Segments may only contain letters, digits, '-' and '_'; use --revision for revisions",
        ),
        PkgctlError::NotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("List existing package revisions with 'pkgctl rpkg get'"),
        PkgctlError::AlreadyExists {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Choose a different workspace name for the new package revision"),
        PkgctlError::Conflict {
            ..
        } => ErrorContext::new(error)
            .with_details("Another client updated the object after it was read")
            .with_suggestion("Re-run the command to apply it on top of the latest version"),
        PkgctlError::SourceNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the source name and revision with 'pkgctl rpkg get'"),
        PkgctlError::InvalidTarget {
            source, ..
        } => {
            let details = source.to_string();
            ErrorContext::new(error).with_details(details)
        }
        PkgctlError::IoFailure {
            source, ..
        } => {
            let details = source.to_string();
            ErrorContext::new(error)
                .with_details(details)
                .with_suggestion("Check that the path exists and that you have permission to access it")
        }
        PkgctlError::InvalidResourcePath {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Resource paths must be relative and must not contain '..' segments"),
        PkgctlError::InvalidStream {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Provide one or more YAML documents separated by '---'"),
        PkgctlError::ConfigurationError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Inspect the configuration with 'pkgctl config show'"),
        PkgctlError::RepositoryNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("List registered repositories with 'pkgctl repo list'"),
        PkgctlError::InvalidLifecycleTransition {
            ..
        } => ErrorContext::new(error).with_details(
            "Lifecycles only move forward: draft -> proposed -> published; \
             draft and proposed revisions may become deletionCandidate",
        ),
        PkgctlError::LifecycleViolation {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Clone the revision into a new workspace and push there"),
        PkgctlError::Transport {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check --server / PKGCTL_SERVER and that the package server is running"),
        PkgctlError::Cancelled {
            ..
        }
        | PkgctlError::CommandFailed {
            ..
        } => ErrorContext::new(error),
    }
}
