//! Computed-status filtering for bulk listing.
//!
//! [`StatusFilter`] expresses "proposals whose computed status is X" as a
//! disjunction of [`Clause`]s over stored columns, so a store can select
//! matching rows without materialising the computed status first. The same
//! clauses drive the in-memory [`StatusFilter::matches`] and the SQL
//! rendering in [`StatusFilter::to_sql`].

use agora_types::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::status::{ComputedStatus, PersistedStatus};
use crate::GovernanceError;

/// A comparison between the voting window and `now`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeCondition {
    /// `now < start_time`
    BeforeStart,
    /// `start_time <= now`
    Started,
    /// `now < end_time`
    BeforeEnd,
    /// `end_time <= now`
    Ended,
}

impl TimeCondition {
    pub fn holds(&self, start: Timestamp, end: Timestamp, now: Timestamp) -> bool {
        match self {
            Self::BeforeStart => now < start,
            Self::Started => start <= now,
            Self::BeforeEnd => now < end,
            Self::Ended => end <= now,
        }
    }

    fn sql(&self, now_param: &str) -> String {
        match self {
            Self::BeforeStart => format!("start_time > {now_param}"),
            Self::Started => format!("start_time <= {now_param}"),
            Self::BeforeEnd => format!("end_time > {now_param}"),
            Self::Ended => format!("end_time <= {now_param}"),
        }
    }
}

/// A conjunction: the persisted status equals `status` and every condition holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Clause {
    pub status: PersistedStatus,
    pub conditions: &'static [TimeCondition],
}

impl Clause {
    pub fn holds(
        &self,
        persisted: PersistedStatus,
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
    ) -> bool {
        self.status == persisted && self.conditions.iter().all(|c| c.holds(start, end, now))
    }

    fn sql(&self, now_param: &str) -> String {
        let mut parts = vec![format!("status = '{}'", self.status)];
        parts.extend(self.conditions.iter().map(|c| c.sql(now_param)));
        format!("({})", parts.join(" AND "))
    }
}

const PENDING: &[Clause] = &[Clause {
    status: PersistedStatus::Published,
    conditions: &[TimeCondition::BeforeStart],
}];

const ACTIVE: &[Clause] = &[Clause {
    status: PersistedStatus::Published,
    conditions: &[TimeCondition::Started, TimeCondition::BeforeEnd],
}];

const CLOSED: &[Clause] = &[
    Clause {
        status: PersistedStatus::Closed,
        conditions: &[],
    },
    Clause {
        status: PersistedStatus::Published,
        conditions: &[TimeCondition::Ended],
    },
];

const CANCELLED: &[Clause] = &[Clause {
    status: PersistedStatus::Cancelled,
    conditions: &[],
}];

/// Select proposals by computed status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Pending,
    Active,
    Closed,
    Cancelled,
}

impl StatusFilter {
    /// The computed status this filter selects.
    pub fn status(&self) -> ComputedStatus {
        match self {
            Self::Pending => ComputedStatus::Pending,
            Self::Active => ComputedStatus::Active,
            Self::Closed => ComputedStatus::Closed,
            Self::Cancelled => ComputedStatus::Cancelled,
        }
    }

    pub fn clauses(&self) -> &'static [Clause] {
        match self {
            Self::Pending => PENDING,
            Self::Active => ACTIVE,
            Self::Closed => CLOSED,
            Self::Cancelled => CANCELLED,
        }
    }

    pub fn matches(
        &self,
        persisted: PersistedStatus,
        start: Timestamp,
        end: Timestamp,
        now: Timestamp,
    ) -> bool {
        self.clauses()
            .iter()
            .any(|clause| clause.holds(persisted, start, end, now))
    }

    /// Render as a SQL boolean expression over `status`, `start_time` and
    /// `end_time`, comparing against the bind parameter `now_param`.
    pub fn to_sql(&self, now_param: &str) -> String {
        let clauses: Vec<String> = self.clauses().iter().map(|c| c.sql(now_param)).collect();
        format!("({})", clauses.join(" OR "))
    }
}

impl From<ComputedStatus> for StatusFilter {
    fn from(status: ComputedStatus) -> Self {
        match status {
            ComputedStatus::Pending => Self::Pending,
            ComputedStatus::Active => Self::Active,
            ComputedStatus::Closed => Self::Closed,
            ComputedStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status().as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(GovernanceError::InvalidProposal(format!(
                "unknown status filter: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::compute_status;

    const STATUSES: [PersistedStatus; 4] = [
        PersistedStatus::Draft,
        PersistedStatus::Published,
        PersistedStatus::Cancelled,
        PersistedStatus::Closed,
    ];

    #[test]
    fn agrees_with_resolver_around_boundaries() {
        let (start, end) = (Timestamp::new(100), Timestamp::new(200));
        for persisted in STATUSES {
            for now in [0, 99, 100, 101, 199, 200, 201] {
                let now = Timestamp::new(now);
                let computed = compute_status(persisted, start, end, now);
                for status in ComputedStatus::ALL {
                    let filter = StatusFilter::from(status);
                    assert_eq!(
                        filter.matches(persisted, start, end, now),
                        computed == Some(status),
                        "{persisted} at {now} vs {filter}"
                    );
                }
            }
        }
    }

    #[test]
    fn closed_includes_persisted_closed() {
        let f = StatusFilter::Closed;
        assert!(f.matches(
            PersistedStatus::Closed,
            Timestamp::new(100),
            Timestamp::new(200),
            Timestamp::new(50)
        ));
    }

    #[test]
    fn renders_sql() {
        assert_eq!(
            StatusFilter::Active.to_sql("$1"),
            "((status = 'published' AND start_time <= $1 AND end_time > $1))"
        );
        assert_eq!(
            StatusFilter::Closed.to_sql("$now"),
            "((status = 'closed') OR (status = 'published' AND end_time <= $now))"
        );
    }

    #[test]
    fn parses_filter_names() {
        assert_eq!("pending".parse::<StatusFilter>().unwrap(), StatusFilter::Pending);
        assert!("draft".parse::<StatusFilter>().is_err());
    }
}
