//! Listing queries and pages.

use agora_governance::{Proposal, StatusFilter};
use agora_types::{CommunityId, Timestamp};
use serde::{Deserialize, Serialize};

/// Default page size when `count` is not specified.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Maximum allowed page size.
pub const MAX_PAGE_SIZE: usize = 100;

/// Order of proposals by creation time (ties broken by id).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Parameters of a community listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub community_id: CommunityId,
    #[serde(default)]
    pub status_filter: Option<StatusFilter>,
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub count: Option<usize>,
}

impl ListQuery {
    pub fn new(community_id: CommunityId) -> Self {
        Self {
            community_id,
            status_filter: None,
            order: SortOrder::default(),
            start: 0,
            count: None,
        }
    }

    pub fn with_filter(mut self, filter: StatusFilter) -> Self {
        self.status_filter = Some(filter);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_page(mut self, start: usize, count: usize) -> Self {
        self.start = start;
        self.count = Some(count);
        self
    }

    /// Resolve effective page size, clamped to [1, MAX_PAGE_SIZE].
    pub fn effective_count(&self) -> usize {
        self.count
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Whether `proposal` belongs in this listing at `now`, ignoring paging.
    pub fn matches(&self, proposal: &Proposal, now: Timestamp) -> bool {
        proposal.community_id == self.community_id
            && self.status_filter.map_or(true, |filter| {
                filter.matches(proposal.status, proposal.start_time, proposal.end_time, now)
            })
    }

    /// Filter, order and page a full scan of proposals.
    ///
    /// Backends without secondary indexes hand their scan to this.
    pub fn select(
        &self,
        proposals: impl IntoIterator<Item = Proposal>,
        now: Timestamp,
    ) -> Page<Proposal> {
        let mut matching: Vec<Proposal> = proposals
            .into_iter()
            .filter(|p| self.matches(p, now))
            .collect();
        matching.sort_by_key(|p| (p.created_at, p.id));
        if self.order == SortOrder::Desc {
            matching.reverse();
        }
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(self.start)
            .take(self.effective_count())
            .collect();
        Page { items, total }
    }
}

/// One page of a listing plus the number of matches across all pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}
