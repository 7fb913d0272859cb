//! LMDB implementation of VoteStore.
//!
//! Votes use composite keys `proposal_id (BE) ++ voter address bytes` so
//! each vote is its own LMDB entry. Listing a proposal's votes is a prefix
//! scan, which also yields them in voter-address order.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use agora_governance::Vote;
use agora_store::{StoreError, VoteStore};
use agora_types::{Address, ProposalId};

use crate::LmdbError;

pub struct LmdbVoteStore {
    pub(crate) env: Arc<Env>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
}

/// Build composite key `proposal_id ++ voter`.
fn composite_key(proposal: ProposalId, voter: &Address) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&proposal.to_be_bytes());
    key[8..].copy_from_slice(&voter.to_bytes());
    key
}

impl VoteStore for LmdbVoteStore {
    fn create_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        let key = composite_key(vote.proposal_id, &vote.voter);
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .votes_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(LmdbError::Duplicate(format!(
                "vote by {} on proposal {}",
                vote.voter, vote.proposal_id
            ))
            .into());
        }
        let bytes = bincode::serialize(vote).map_err(LmdbError::from)?;
        self.votes_db
            .put(&mut wtxn, &key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_vote(&self, proposal: ProposalId, voter: &Address) -> Result<Vote, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .votes_db
            .get(&rtxn, &composite_key(proposal, voter))
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("vote by {voter} on proposal {proposal}")))?;
        Ok(bincode::deserialize(bytes).map_err(LmdbError::from)?)
    }

    fn list_votes(
        &self,
        proposal: ProposalId,
        start: usize,
        count: usize,
    ) -> Result<Vec<Vote>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = proposal.to_be_bytes();
        let mut votes = Vec::new();
        let iter = self
            .votes_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;
        for item in iter.skip(start).take(count) {
            let (_key, val) = item.map_err(LmdbError::from)?;
            votes.push(bincode::deserialize(val).map_err(LmdbError::from)?);
        }
        Ok(votes)
    }

    fn count_votes(&self, proposal: ProposalId) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = proposal.to_be_bytes();
        let mut count = 0u64;
        for item in self
            .votes_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?
        {
            item.map_err(LmdbError::from)?;
            count += 1;
        }
        Ok(count)
    }
}
