//! Vote storage trait.

use agora_governance::Vote;
use agora_types::{Address, ProposalId};

use crate::StoreError;

pub trait VoteStore: Send + Sync {
    /// Record a vote. Fails with [`StoreError::Duplicate`] if the voter has
    /// already voted on the proposal.
    fn create_vote(&self, vote: &Vote) -> Result<(), StoreError>;

    /// A specific voter's vote on a proposal.
    fn get_vote(&self, proposal: ProposalId, voter: &Address) -> Result<Vote, StoreError>;

    /// A page of a proposal's votes, ordered by voter address.
    fn list_votes(
        &self,
        proposal: ProposalId,
        start: usize,
        count: usize,
    ) -> Result<Vec<Vote>, StoreError>;

    /// Number of votes cast on a proposal.
    fn count_votes(&self, proposal: ProposalId) -> Result<u64, StoreError>;
}
