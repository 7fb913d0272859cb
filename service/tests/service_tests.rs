//! End-to-end tests of the proposal service:
//! proposal creation → lifecycle → vote casting → listing.
//!
//! Collaborators are the in-memory nullables, so time, balances and content
//! identifiers are fully controlled. The last section runs the same flow
//! against the LMDB store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use agora_governance::{
    ComputedStatus, ExecutionMode, GovernanceError, NewProposal, NewVote, PersistedStatus,
    Proposal, StatusFilter,
};
use agora_nullables::{NullBalanceOracle, NullClock, NullPinner, NullStore};
use agora_service::{ProposalService, ServiceError};
use agora_store::{ListQuery, Page, ProposalStore, StoreError};
use agora_store_lmdb::LmdbEnvironment;
use agora_types::{Address, CommunityId, ProposalId, Timestamp};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SNAPSHOT_HEIGHT: u64 = 777;
const START: u64 = 1_000;
const END: u64 = 2_000;

struct Harness {
    service: ProposalService,
    store: Arc<NullStore>,
    oracle: Arc<NullBalanceOracle>,
    pinner: Arc<NullPinner>,
    clock: Arc<NullClock>,
}

fn harness(mode: ExecutionMode) -> Harness {
    let store = Arc::new(NullStore::new());
    let oracle = Arc::new(NullBalanceOracle::new(SNAPSHOT_HEIGHT));
    let pinner = Arc::new(NullPinner::new());
    let clock = Arc::new(NullClock::new(500));
    let service = ProposalService::new(
        store.clone(),
        store.clone(),
        oracle.clone(),
        pinner.clone(),
        mode,
    )
    .with_clock(clock.clone());
    Harness {
        service,
        store,
        oracle,
        pinner,
        clock,
    }
}

fn addr(s: &str) -> Address {
    Address::parse(s).expect("valid address")
}

fn new_proposal(strategy: Option<&str>) -> NewProposal {
    NewProposal {
        community_id: CommunityId::new(1),
        name: "Treasury allocation".into(),
        choices: vec!["yes".into(), "no".into(), "abstain".into()],
        body: "<p>Spend 10% on grants.</p>".into(),
        strategy: strategy.map(str::to_string),
        max_weight: None,
        min_balance: None,
        creator: addr("0xf8d6e0586b0a20c7"),
        start_time: Timestamp::new(START),
        end_time: Timestamp::new(END),
        status: PersistedStatus::Published,
        composite_signatures: Vec::new(),
    }
}

fn ballot(proposal: ProposalId, voter: &str, choice: &str) -> NewVote {
    NewVote {
        proposal_id: proposal,
        voter: addr(voter),
        choice: choice.into(),
        composite_signatures: Vec::new(),
    }
}

fn not_live_status(err: &ServiceError) -> Option<&str> {
    match err {
        ServiceError::Governance(GovernanceError::ProposalNotLive { status, .. }) => {
            Some(status.as_str())
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// 1. Proposal creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_binds_snapshot_height_and_cid() {
    let h = harness(ExecutionMode::Production);
    let view = h.service.create_proposal(new_proposal(None)).await.unwrap();

    assert_eq!(view.proposal.id, ProposalId::new(1));
    assert_eq!(view.proposal.block_height, SNAPSHOT_HEIGHT);
    assert_eq!(view.proposal.cid.as_deref(), Some("null-cid-1"));
    assert_eq!(view.proposal.created_at, Timestamp::new(500));
    assert_eq!(view.computed_status, Some(ComputedStatus::Pending));
    assert_eq!(view.total_votes, 0);

    let pinned = h.pinner.pinned_json();
    assert_eq!(pinned.len(), 1);
    assert_eq!(pinned[0]["name"], "Treasury allocation");
    assert_eq!(h.store.proposal_count(), 1);
}

#[tokio::test]
async fn invalid_proposal_touches_nothing() {
    let h = harness(ExecutionMode::Production);
    let mut p = new_proposal(None);
    p.end_time = p.start_time;

    let err = h.service.create_proposal(p).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Governance(GovernanceError::InvalidProposal(_))
    ));
    assert!(h.pinner.pinned_json().is_empty());
    assert_eq!(h.store.proposal_count(), 0);
}

#[tokio::test]
async fn unknown_strategy_rejected_at_creation() {
    let h = harness(ExecutionMode::Production);
    let err = h
        .service
        .create_proposal(new_proposal(Some("quadratic")))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Governance(GovernanceError::UnsupportedStrategy(ref s)) if s == "quadratic"
    ));
}

#[tokio::test]
async fn collaborator_failures_are_surfaced() {
    let h = harness(ExecutionMode::Production);
    h.pinner.fail_with("quota exceeded");
    let err = h.service.create_proposal(new_proposal(None)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Pinning(_)));
    assert_eq!(err.to_string(), "pinning error: quota exceeded");

    let h = harness(ExecutionMode::Production);
    h.oracle.set_unreachable(true);
    let err = h.service.create_proposal(new_proposal(None)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Snapshot(_)));
    assert_eq!(h.store.proposal_count(), 0);
}

// ---------------------------------------------------------------------------
// 2. Lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn computed_status_follows_the_clock() {
    let h = harness(ExecutionMode::Production);
    let id = h.service.create_proposal(new_proposal(None)).await.unwrap().proposal.id;

    h.clock.set(START);
    assert_eq!(
        h.service.get_proposal(id).unwrap().computed_status,
        Some(ComputedStatus::Active)
    );
    h.clock.set(END);
    let view = h.service.get_proposal(id).unwrap();
    assert_eq!(view.computed_status, Some(ComputedStatus::Closed));
    assert_eq!(view.proposal.status, PersistedStatus::Published);
}

#[tokio::test]
async fn status_transitions_are_enforced() {
    let h = harness(ExecutionMode::Production);
    let mut draft = new_proposal(None);
    draft.status = PersistedStatus::Draft;
    let id = h.service.create_proposal(draft).await.unwrap().proposal.id;
    assert_eq!(h.service.get_proposal(id).unwrap().computed_status, None);

    let view = h.service.update_status(id, PersistedStatus::Published).unwrap();
    assert_eq!(view.computed_status, Some(ComputedStatus::Pending));

    let err = h.service.update_status(id, PersistedStatus::Draft).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Governance(GovernanceError::InvalidTransition {
            from: PersistedStatus::Published,
            to: PersistedStatus::Draft,
        })
    ));

    let view = h.service.update_status(id, PersistedStatus::Cancelled).unwrap();
    assert_eq!(view.computed_status, Some(ComputedStatus::Cancelled));
    assert!(h.service.update_status(id, PersistedStatus::Closed).is_err());
}

/// Holds the first two reads until both have happened, so two status
/// changes are checked against the same stale record before either writes.
struct LockstepReads {
    inner: Arc<NullStore>,
    barrier: Barrier,
    reads: AtomicUsize,
}

impl ProposalStore for LockstepReads {
    fn create_proposal(&self, proposal: &Proposal) -> Result<(ProposalId, Timestamp), StoreError> {
        self.inner.create_proposal(proposal)
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Proposal, StoreError> {
        let proposal = self.inner.get_proposal(id);
        if self.reads.fetch_add(1, Ordering::SeqCst) < 2 {
            self.barrier.wait();
        }
        proposal
    }

    fn transition_status(
        &self,
        id: ProposalId,
        expected: PersistedStatus,
        next: PersistedStatus,
    ) -> Result<(), StoreError> {
        self.inner.transition_status(id, expected, next)
    }

    fn list_by_community(
        &self,
        query: &ListQuery,
        now: Timestamp,
    ) -> Result<Page<Proposal>, StoreError> {
        self.inner.list_by_community(query, now)
    }
}

#[test]
fn racing_terminal_transitions_have_one_winner() {
    let store = Arc::new(NullStore::new());
    let record = new_proposal(None).into_proposal(SNAPSHOT_HEIGHT, None, Timestamp::new(1));
    let (id, _) = store.create_proposal(&record).unwrap();

    let lockstep = Arc::new(LockstepReads {
        inner: store.clone(),
        barrier: Barrier::new(2),
        reads: AtomicUsize::new(0),
    });
    let service = Arc::new(ProposalService::new(
        lockstep,
        store.clone(),
        Arc::new(NullBalanceOracle::default()),
        Arc::new(NullPinner::new()),
        ExecutionMode::Production,
    ));

    let handles: Vec<_> = [PersistedStatus::Cancelled, PersistedStatus::Closed]
        .into_iter()
        .map(|next| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.update_status(id, next))
        })
        .collect();
    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners: Vec<_> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(ServiceError::Store(StoreError::Conflict(_))))));
    assert_eq!(
        store.get_proposal(id).unwrap().status,
        winners[0].proposal.status
    );
}

#[tokio::test]
async fn missing_proposal_is_not_found() {
    let h = harness(ExecutionMode::Production);
    assert!(matches!(
        h.service.get_proposal(ProposalId::new(42)),
        Err(ServiceError::Store(StoreError::NotFound(_)))
    ));
    assert!(matches!(
        h.service.list_votes(ProposalId::new(42), 0, 10),
        Err(ServiceError::Store(StoreError::NotFound(_)))
    ));
}

// ---------------------------------------------------------------------------
// 3. Voting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn vote_weighted_by_snapshot_balance() {
    let h = harness(ExecutionMode::Production);
    let id = h.service.create_proposal(new_proposal(None)).await.unwrap().proposal.id;
    let voter = addr("0x01cf0e2f2f715450");
    h.oracle.set_balance(&voter, 300, 200);
    h.clock.set(1_500);

    let vote = h
        .service
        .cast_vote(ballot(id, "0x01cf0e2f2f715450", "yes"))
        .await
        .unwrap();
    assert_eq!(vote.weight, Some(500));
    assert_eq!(vote.block_height, SNAPSHOT_HEIGHT);
    assert_eq!(vote.cid.as_deref(), Some("null-cid-2"));
    assert_eq!(vote.created_at, Timestamp::new(1_500));
    assert_eq!(h.oracle.queries(), vec![(voter.clone(), SNAPSHOT_HEIGHT)]);

    assert_eq!(h.service.get_vote(id, &voter).unwrap(), vote);
    assert_eq!(h.service.get_proposal(id).unwrap().total_votes, 1);
}

#[tokio::test]
async fn vote_outside_window_is_rejected() {
    let h = harness(ExecutionMode::Production);
    let id = h.service.create_proposal(new_proposal(None)).await.unwrap().proposal.id;

    let err = h.service.cast_vote(ballot(id, "0x02", "yes")).await.unwrap_err();
    assert_eq!(not_live_status(&err), Some("pending"));

    h.clock.set(END);
    let err = h.service.cast_vote(ballot(id, "0x02", "yes")).await.unwrap_err();
    assert_eq!(not_live_status(&err), Some("closed"));
    assert!(h.oracle.queries().is_empty());
}

#[tokio::test]
async fn cancelled_proposal_takes_no_votes() {
    let h = harness(ExecutionMode::Test);
    let id = h.service.create_proposal(new_proposal(None)).await.unwrap().proposal.id;
    h.service.update_status(id, PersistedStatus::Cancelled).unwrap();
    h.clock.set(1_500);

    let err = h.service.cast_vote(ballot(id, "0x02", "yes")).await.unwrap_err();
    assert_eq!(not_live_status(&err), Some("cancelled"));
}

#[tokio::test]
async fn one_vote_per_voter() {
    let h = harness(ExecutionMode::Test);
    let id = h.service.create_proposal(new_proposal(None)).await.unwrap().proposal.id;
    h.clock.set(1_500);

    h.service.cast_vote(ballot(id, "0x03", "yes")).await.unwrap();
    let err = h.service.cast_vote(ballot(id, "0x03", "no")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::Duplicate(_))));
    assert_eq!(h.service.get_proposal(id).unwrap().total_votes, 1);
}

#[tokio::test]
async fn unknown_choice_is_rejected() {
    let h = harness(ExecutionMode::Test);
    let id = h.service.create_proposal(new_proposal(None)).await.unwrap().proposal.id;
    h.clock.set(1_500);

    let err = h.service.cast_vote(ballot(id, "0x03", "maybe")).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Governance(GovernanceError::InvalidChoice(_))
    ));
}

#[tokio::test]
async fn insufficient_balance_records_nothing() {
    let h = harness(ExecutionMode::Production);
    let mut p = new_proposal(Some("staked-token-weighted-default"));
    p.min_balance = Some(1_000);
    let id = h.service.create_proposal(p).await.unwrap().proposal.id;
    let voter = addr("0x04");
    // Plenty in the primary account, but only staking counts.
    h.oracle.set_balance(&voter, 999, 50_000);
    h.clock.set(1_500);

    let err = h.service.cast_vote(ballot(id, "0x04", "no")).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Governance(GovernanceError::InsufficientBalance {
            weight: 999,
            required: 1_000,
            ..
        })
    ));
    assert_eq!(h.pinner.pinned_json().len(), 1);
    assert_eq!(h.service.get_proposal(id).unwrap().total_votes, 0);
}

#[tokio::test]
async fn capped_strategy_clamps_recorded_weight() {
    let h = harness(ExecutionMode::Production);
    let mut p = new_proposal(Some("token-weighted-capped"));
    p.max_weight = Some(100);
    let id = h.service.create_proposal(p).await.unwrap().proposal.id;
    h.oracle.set_balance(&addr("0x05"), 400, 100);
    h.oracle.set_balance(&addr("0x06"), 30, 10);
    h.clock.set(1_500);

    let whale = h.service.cast_vote(ballot(id, "0x05", "yes")).await.unwrap();
    let minnow = h.service.cast_vote(ballot(id, "0x06", "no")).await.unwrap();
    assert_eq!(whale.weight, Some(100));
    assert_eq!(minnow.weight, Some(40));
}

#[tokio::test]
async fn bypass_mode_accepts_empty_balances() {
    let h = harness(ExecutionMode::Development);
    let id = h.service.create_proposal(new_proposal(None)).await.unwrap().proposal.id;
    h.clock.set(1_500);

    let vote = h.service.cast_vote(ballot(id, "0x07", "abstain")).await.unwrap();
    assert_eq!(vote.weight, None);
}

// ---------------------------------------------------------------------------
// 4. Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_filters_by_computed_status() {
    let h = harness(ExecutionMode::Test);
    let early = h.service.create_proposal(new_proposal(None)).await.unwrap().proposal.id;
    h.clock.set(600);
    let mut later = new_proposal(None);
    later.start_time = Timestamp::new(3_000);
    later.end_time = Timestamp::new(4_000);
    let late = h.service.create_proposal(later).await.unwrap().proposal.id;
    h.clock.set(1_500);
    h.service.cast_vote(ballot(early, "0x08", "yes")).await.unwrap();

    let active = h
        .service
        .list_proposals(&ListQuery::new(CommunityId::new(1)).with_filter(StatusFilter::Active))
        .unwrap();
    assert_eq!(active.total, 1);
    assert_eq!(active.items[0].proposal.id, early);
    assert_eq!(active.items[0].total_votes, 1);
    assert_eq!(active.items[0].computed_status, Some(ComputedStatus::Active));

    let all = h
        .service
        .list_proposals(&ListQuery::new(CommunityId::new(1)))
        .unwrap();
    let ids: Vec<_> = all.items.iter().map(|v| v.proposal.id).collect();
    assert_eq!(ids, vec![late, early]);

    let other = h
        .service
        .list_proposals(&ListQuery::new(CommunityId::new(2)))
        .unwrap();
    assert!(other.items.is_empty());
    assert_eq!(other.total, 0);
}

#[tokio::test]
async fn list_votes_pages() {
    let h = harness(ExecutionMode::Test);
    let id = h.service.create_proposal(new_proposal(None)).await.unwrap().proposal.id;
    h.clock.set(1_500);
    for voter in ["0x0a", "0x0b", "0x0c"] {
        h.service.cast_vote(ballot(id, voter, "yes")).await.unwrap();
    }

    assert_eq!(h.service.list_votes(id, 0, 10).unwrap().len(), 3);
    assert_eq!(h.service.list_votes(id, 2, 10).unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// 5. LMDB backend
// ---------------------------------------------------------------------------

#[tokio::test]
async fn full_flow_on_lmdb() {
    let dir = tempfile::tempdir().expect("temp dir");
    let env = LmdbEnvironment::open(dir.path(), 64 * 1024 * 1024).expect("open env");
    let oracle = Arc::new(NullBalanceOracle::new(SNAPSHOT_HEIGHT));
    let clock = Arc::new(NullClock::new(500));
    let service = ProposalService::new(
        Arc::new(env.proposal_store()),
        Arc::new(env.vote_store()),
        oracle.clone(),
        Arc::new(NullPinner::new()),
        ExecutionMode::Production,
    )
    .with_clock(clock.clone());

    let id = service.create_proposal(new_proposal(None)).await.unwrap().proposal.id;
    oracle.set_balance(&addr("0x0d"), 10, 5);
    clock.set(1_500);
    let vote = service.cast_vote(ballot(id, "0x0d", "no")).await.unwrap();
    assert_eq!(vote.weight, Some(15));

    let err = service.cast_vote(ballot(id, "0x0d", "yes")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::Duplicate(_))));

    service.update_status(id, PersistedStatus::Closed).unwrap();
    let view = service.get_proposal(id).unwrap();
    assert_eq!(view.computed_status, Some(ComputedStatus::Closed));
    assert_eq!(view.total_votes, 1);
    assert_eq!(service.get_vote(id, &addr("0x0d")).unwrap(), vote);
}
