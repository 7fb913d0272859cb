//! Persisted and computed proposal status.
//!
//! A proposal stores a coarse [`PersistedStatus`]. The fine-grained lifecycle
//! phase a reader sees, [`ComputedStatus`], is derived from it and the voting
//! window on every read and is never written back.

use agora_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::GovernanceError;

/// Status as written to the record store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistedStatus {
    Draft,
    Published,
    Cancelled,
    Closed,
}

impl PersistedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Cancelled => "cancelled",
            Self::Closed => "closed",
        }
    }

    /// Whether a stored proposal may move from `self` to `next`.
    ///
    /// Drafts are published or cancelled; published proposals are cancelled
    /// or closed. Cancelled and closed are terminal.
    pub fn can_transition_to(&self, next: PersistedStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Published)
                | (Self::Draft, Self::Cancelled)
                | (Self::Published, Self::Cancelled)
                | (Self::Published, Self::Closed)
        )
    }
}

impl fmt::Display for PersistedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersistedStatus {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "cancelled" => Ok(Self::Cancelled),
            "closed" => Ok(Self::Closed),
            other => Err(GovernanceError::InvalidProposal(format!(
                "unknown status: {other}"
            ))),
        }
    }
}

/// Lifecycle phase derived from the persisted status and the voting window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputedStatus {
    Pending,
    Active,
    Closed,
    Cancelled,
}

impl ComputedStatus {
    pub const ALL: [ComputedStatus; 4] = [
        Self::Pending,
        Self::Active,
        Self::Closed,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ComputedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a persisted status and voting window to the phase observed at `now`.
///
/// Rules apply in order: cancelled and closed are sticky regardless of
/// timing; a published proposal is pending before `start`, active on
/// `[start, end)`, and closed from `end` on. Any other status (drafts) has no
/// computed phase.
pub fn compute_status(
    persisted: PersistedStatus,
    start: Timestamp,
    end: Timestamp,
    now: Timestamp,
) -> Option<ComputedStatus> {
    match persisted {
        PersistedStatus::Cancelled => Some(ComputedStatus::Cancelled),
        PersistedStatus::Closed => Some(ComputedStatus::Closed),
        PersistedStatus::Published if now < start => Some(ComputedStatus::Pending),
        PersistedStatus::Published if now < end => Some(ComputedStatus::Active),
        PersistedStatus::Published => Some(ComputedStatus::Closed),
        PersistedStatus::Draft => None,
    }
}

/// [`compute_status`], reporting the undefined case as an error.
pub fn try_compute_status(
    persisted: PersistedStatus,
    start: Timestamp,
    end: Timestamp,
    now: Timestamp,
) -> Result<ComputedStatus, GovernanceError> {
    compute_status(persisted, start, end, now)
        .ok_or(GovernanceError::UndefinedComputedStatus { status: persisted })
}

/// Whether `now` falls inside the voting window `[start, end)`.
///
/// Agrees with [`compute_status`] returning `Active` for a published proposal.
pub fn is_live(start: Timestamp, end: Timestamp, now: Timestamp) -> bool {
    start <= now && now < end
}
