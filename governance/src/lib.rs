//! Proposal lifecycle and vote eligibility for the agora voting platform.
//!
//! Two pure components live here:
//! - the **status resolver**, mapping a proposal's persisted status and voting
//!   window to its computed phase (`pending → active → closed`, or `cancelled`),
//!   together with [`StatusFilter`], the same mapping expressed as a declarative
//!   predicate for bulk listing;
//! - the **eligibility evaluator**, deciding from a snapshot balance whether an
//!   address may vote under a proposal's strategy and with what weight.
//!
//! Neither reads the clock or the environment: `now` and the [`ExecutionMode`]
//! are always supplied by the caller.

pub mod eligibility;
pub mod error;
pub mod filter;
pub mod mode;
pub mod proposal;
pub mod status;
pub mod strategy;
pub mod vote;

pub use eligibility::{apply_weight_cap, validate_balance, Eligibility};
pub use error::GovernanceError;
pub use filter::{Clause, StatusFilter, TimeCondition};
pub use mode::ExecutionMode;
pub use proposal::{NewProposal, Proposal, ProposalView};
pub use status::{compute_status, is_live, try_compute_status, ComputedStatus, PersistedStatus};
pub use strategy::Strategy;
pub use vote::{NewVote, Vote};
