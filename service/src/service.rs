//! The proposal service.

use std::sync::Arc;

use agora_governance::{
    apply_weight_cap, validate_balance, ExecutionMode, GovernanceError, NewProposal, NewVote,
    PersistedStatus, ProposalView, Vote,
};
use agora_pinning::Pinner;
use agora_snapshot::BalanceOracle;
use agora_store::query::MAX_PAGE_SIZE;
use agora_store::{ListQuery, Page, ProposalStore, StoreError, VoteStore};
use agora_types::{Address, Clock, ProposalId, SystemClock, Timestamp};

use crate::ServiceError;

/// Creates proposals, moves them through their lifecycle and records votes.
pub struct ProposalService {
    proposals: Arc<dyn ProposalStore>,
    votes: Arc<dyn VoteStore>,
    oracle: Arc<dyn BalanceOracle>,
    pinner: Arc<dyn Pinner>,
    clock: Arc<dyn Clock>,
    mode: ExecutionMode,
}

impl ProposalService {
    pub fn new(
        proposals: Arc<dyn ProposalStore>,
        votes: Arc<dyn VoteStore>,
        oracle: Arc<dyn BalanceOracle>,
        pinner: Arc<dyn Pinner>,
        mode: ExecutionMode,
    ) -> Self {
        Self {
            proposals,
            votes,
            oracle,
            pinner,
            clock: Arc::new(SystemClock),
            mode,
        }
    }

    /// Replace the system clock (tests pin time with a null clock).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate, pin and persist a new proposal.
    ///
    /// The proposal is bound to the block height of the latest balance
    /// snapshot; votes on it are weighted by balances at that height.
    pub async fn create_proposal(&self, new: NewProposal) -> Result<ProposalView, ServiceError> {
        let now = self.clock.now();
        new.validate()?;

        let pin = self.pinner.pin_json(&new.pin_payload()).await?;
        let snapshot = self.oracle.latest_snapshot().await?;

        let mut proposal = new.into_proposal(snapshot.block_height, Some(pin.ipfs_hash), now);
        let (id, created_at) = self.proposals.create_proposal(&proposal)?;
        proposal.id = id;
        proposal.created_at = created_at;

        tracing::info!(
            proposal = %id,
            community = %proposal.community_id,
            block_height = proposal.block_height,
            status = %proposal.status,
            "proposal created"
        );
        Ok(ProposalView::new(proposal, now, 0))
    }

    pub fn get_proposal(&self, id: ProposalId) -> Result<ProposalView, ServiceError> {
        let now = self.clock.now();
        self.view(id, now)
    }

    /// One page of a community's proposals, all annotated against the same instant.
    pub fn list_proposals(&self, query: &ListQuery) -> Result<Page<ProposalView>, ServiceError> {
        let now = self.clock.now();
        let page = self.proposals.list_by_community(query, now)?;
        tracing::debug!(
            community = %query.community_id,
            filter = ?query.status_filter,
            returned = page.items.len(),
            total = page.total,
            "listed proposals"
        );

        let mut items = Vec::with_capacity(page.items.len());
        for proposal in page.items {
            let total_votes = self.votes.count_votes(proposal.id)?;
            items.push(ProposalView::new(proposal, now, total_votes));
        }
        Ok(Page {
            items,
            total: page.total,
        })
    }

    /// Move a proposal to `next` if its lifecycle allows it.
    ///
    /// The store only applies the change if the status is still the one the
    /// check saw, so of two racing terminal transitions exactly one wins.
    pub fn update_status(
        &self,
        id: ProposalId,
        next: PersistedStatus,
    ) -> Result<ProposalView, ServiceError> {
        let now = self.clock.now();
        let current = self.proposals.get_proposal(id)?;
        if !current.status.can_transition_to(next) {
            return Err(GovernanceError::InvalidTransition {
                from: current.status,
                to: next,
            }
            .into());
        }
        self.proposals
            .transition_status(id, current.status, next)
            .inspect_err(|e| {
                tracing::warn!(proposal = %id, to = %next, error = %e, "status change rejected");
            })?;
        tracing::info!(
            proposal = %id,
            from = %current.status,
            to = %next,
            "proposal status changed"
        );
        self.view(id, now)
    }

    /// Record a vote.
    ///
    /// The proposal must be live, the choice must be one of its choices and
    /// the voter must not have voted on it yet. The voter's balance at the
    /// proposal's snapshot height decides eligibility and weight.
    pub async fn cast_vote(&self, new: NewVote) -> Result<Vote, ServiceError> {
        let now = self.clock.now();
        let proposal = self.proposals.get_proposal(new.proposal_id)?;

        if !proposal.is_live(now) {
            let status = proposal
                .computed_status(now)
                .map_or_else(|| proposal.status.to_string(), |s| s.as_str().to_string());
            tracing::warn!(
                proposal = %proposal.id,
                voter = %new.voter,
                %status,
                "vote rejected: proposal not live"
            );
            return Err(GovernanceError::ProposalNotLive {
                id: proposal.id,
                status,
            }
            .into());
        }
        proposal.validate_choice(&new.choice)?;

        match self.votes.get_vote(proposal.id, &new.voter) {
            Ok(_) => {
                tracing::warn!(
                    proposal = %proposal.id,
                    voter = %new.voter,
                    "vote rejected: already voted"
                );
                return Err(StoreError::Duplicate(format!(
                    "vote by {} on proposal {}",
                    new.voter, proposal.id
                ))
                .into());
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let balance = self
            .oracle
            .balance_at(&new.voter, proposal.block_height)
            .await?;
        let eligibility = validate_balance(
            proposal.strategy_name(),
            &balance,
            proposal.min_balance,
            self.mode,
        )
        .inspect_err(|e| {
            tracing::warn!(
                proposal = %proposal.id,
                voter = %new.voter,
                error = %e,
                "vote rejected"
            );
        })?;

        let weight = match eligibility.weight() {
            Some(weight) => Some(apply_weight_cap(
                proposal.strategy()?,
                weight,
                proposal.max_weight,
            )),
            None => None,
        };

        let pin = self.pinner.pin_json(&new.pin_payload()).await?;
        let vote = Vote::from_new(new, weight, proposal.block_height, Some(pin.ipfs_hash), now);
        self.votes.create_vote(&vote)?;

        tracing::info!(
            proposal = %vote.proposal_id,
            voter = %vote.voter,
            choice = %vote.choice,
            weight = ?vote.weight,
            "vote recorded"
        );
        Ok(vote)
    }

    pub fn get_vote(&self, proposal: ProposalId, voter: &Address) -> Result<Vote, ServiceError> {
        Ok(self.votes.get_vote(proposal, voter)?)
    }

    /// Votes on an existing proposal; `count` is capped at the maximum page size.
    pub fn list_votes(
        &self,
        proposal: ProposalId,
        start: usize,
        count: usize,
    ) -> Result<Vec<Vote>, ServiceError> {
        self.proposals.get_proposal(proposal)?;
        let votes = self
            .votes
            .list_votes(proposal, start, count.clamp(1, MAX_PAGE_SIZE))?;
        tracing::debug!(proposal = %proposal, returned = votes.len(), "listed votes");
        Ok(votes)
    }

    fn view(&self, id: ProposalId, now: Timestamp) -> Result<ProposalView, ServiceError> {
        let proposal = self.proposals.get_proposal(id)?;
        let total_votes = self.votes.count_votes(id)?;
        tracing::debug!(proposal = %id, total_votes, "loaded proposal");
        Ok(ProposalView::new(proposal, now, total_votes))
    }
}
