//! Package revision lifecycle.
//!
//! ```text
//! draft ──> proposed ──> published
//!   │          │
//!   └──────────┴──> deletionCandidate
//! ```
//!
//! Transitions only move forward. The server has the final word on whether
//! a transition is accepted; [`Lifecycle::can_transition_to`] lets the
//! client refuse obviously illegal requests before sending them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Approval state of a package revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Lifecycle {
    /// Mutable work in progress; the only state that accepts pushes
    #[default]
    Draft,
    /// Submitted for approval
    Proposed,
    /// Approved and immutable
    Published,
    /// Marked for removal
    DeletionCandidate,
}

impl Lifecycle {
    pub const ALL: [Lifecycle; 4] =
        [Self::Draft, Self::Proposed, Self::Published, Self::DeletionCandidate];

    /// Whether a revision in `self` may be moved to `next`.
    ///
    /// Requesting the current state is allowed and treated as a no-op.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Draft)
                | (Self::Proposed, Self::Proposed)
                | (Self::Published, Self::Published)
                | (Self::DeletionCandidate, Self::DeletionCandidate)
                | (Self::Draft, Self::Proposed)
                | (Self::Proposed, Self::Published)
                | (Self::Draft | Self::Proposed, Self::DeletionCandidate)
        )
    }

    /// Only drafts accept content changes.
    #[must_use]
    pub const fn is_mutable(self) -> bool {
        matches!(self, Self::Draft)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Proposed => "proposed",
            Self::Published => "published",
            Self::DeletionCandidate => "deletionCandidate",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lifecycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            s.chars().filter(|c| !matches!(c, '-' | '_')).collect::<String>().to_lowercase();
        match normalized.as_str() {
            "draft" => Ok(Self::Draft),
            "proposed" => Ok(Self::Proposed),
            "published" => Ok(Self::Published),
            "deletioncandidate" => Ok(Self::DeletionCandidate),
            _ => {
                let expected: Vec<&str> = Self::ALL.iter().map(|l| l.as_str()).collect();
                Err(format!("unknown lifecycle '{s}' (expected one of: {})", expected.join(", ")))
            }
        }
    }
}
