//! Nullable store: thread-safe in-memory storage for testing.

use agora_governance::{PersistedStatus, Proposal, Vote};
use agora_store::{ListQuery, Page, ProposalStore, StoreError, VoteStore};
use agora_types::{Address, ProposalId, Timestamp};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// An in-memory proposal + vote store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    proposals: Mutex<BTreeMap<ProposalId, Proposal>>,
    votes: Mutex<BTreeMap<(ProposalId, Address), Vote>>,
    /// When set, every operation fails with a backend error.
    failure: Mutex<Option<String>>,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            proposals: Mutex::new(BTreeMap::new()),
            votes: Mutex::new(BTreeMap::new()),
            failure: Mutex::new(None),
        }
    }

    /// Make every subsequent call fail with `StoreError::Backend(message)`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// Number of stored proposals (for assertions).
    pub fn proposal_count(&self) -> usize {
        self.proposals.lock().unwrap().len()
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(StoreError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalStore for NullStore {
    fn create_proposal(&self, proposal: &Proposal) -> Result<(ProposalId, Timestamp), StoreError> {
        self.check()?;
        let mut proposals = self.proposals.lock().unwrap();
        let next = proposals.keys().next_back().map_or(1, |id| id.get() + 1);
        let id = ProposalId::new(next);
        let mut record = proposal.clone();
        record.id = id;
        let created_at = record.created_at;
        proposals.insert(id, record);
        Ok((id, created_at))
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Proposal, StoreError> {
        self.check()?;
        self.proposals
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))
    }

    fn transition_status(
        &self,
        id: ProposalId,
        expected: PersistedStatus,
        next: PersistedStatus,
    ) -> Result<(), StoreError> {
        self.check()?;
        let mut proposals = self.proposals.lock().unwrap();
        let record = proposals
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))?;
        if record.status != expected {
            return Err(StoreError::Conflict(format!(
                "proposal {id} is {}, expected {expected}",
                record.status
            )));
        }
        record.status = next;
        Ok(())
    }

    fn list_by_community(
        &self,
        query: &ListQuery,
        now: Timestamp,
    ) -> Result<Page<Proposal>, StoreError> {
        self.check()?;
        let proposals = self.proposals.lock().unwrap();
        Ok(query.select(proposals.values().cloned(), now))
    }
}

impl VoteStore for NullStore {
    fn create_vote(&self, vote: &Vote) -> Result<(), StoreError> {
        self.check()?;
        let mut votes = self.votes.lock().unwrap();
        let key = (vote.proposal_id, vote.voter.clone());
        if votes.contains_key(&key) {
            return Err(StoreError::Duplicate(format!(
                "vote by {} on proposal {}",
                vote.voter, vote.proposal_id
            )));
        }
        votes.insert(key, vote.clone());
        Ok(())
    }

    fn get_vote(&self, proposal: ProposalId, voter: &Address) -> Result<Vote, StoreError> {
        self.check()?;
        self.votes
            .lock()
            .unwrap()
            .get(&(proposal, voter.clone()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("vote by {voter} on proposal {proposal}")))
    }

    fn list_votes(
        &self,
        proposal: ProposalId,
        start: usize,
        count: usize,
    ) -> Result<Vec<Vote>, StoreError> {
        self.check()?;
        Ok(self
            .votes
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.proposal_id == proposal)
            .skip(start)
            .take(count)
            .cloned()
            .collect())
    }

    fn count_votes(&self, proposal: ProposalId) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self
            .votes
            .lock()
            .unwrap()
            .keys()
            .filter(|(id, _)| *id == proposal)
            .count() as u64)
    }
}
