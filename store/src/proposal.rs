//! Proposal storage trait.

use agora_governance::{PersistedStatus, Proposal};
use agora_types::{ProposalId, Timestamp};

use crate::{ListQuery, Page, StoreError};

pub trait ProposalStore: Send + Sync {
    /// Persist a new proposal, assigning its id.
    ///
    /// Returns the assigned id and the stored creation time. The proposal's
    /// own `id` field is ignored.
    fn create_proposal(&self, proposal: &Proposal) -> Result<(ProposalId, Timestamp), StoreError>;

    /// Get a proposal by id.
    fn get_proposal(&self, id: ProposalId) -> Result<Proposal, StoreError>;

    /// Move a proposal from `expected` to `next` in one atomic step.
    ///
    /// Fails with [`StoreError::Conflict`] when the stored status is no
    /// longer `expected`, leaving the record untouched.
    fn transition_status(
        &self,
        id: ProposalId,
        expected: PersistedStatus,
        next: PersistedStatus,
    ) -> Result<(), StoreError>;

    /// List a community's proposals, optionally filtered by computed status
    /// at `now`. An empty page (not an error) when nothing matches.
    fn list_by_community(
        &self,
        query: &ListQuery,
        now: Timestamp,
    ) -> Result<Page<Proposal>, StoreError>;
}
