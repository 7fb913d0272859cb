use agora_types::ProposalId;
use thiserror::Error;

use crate::status::PersistedStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("strategy not implemented: {0}")]
    UnsupportedStrategy(String),

    #[error("insufficient balance for strategy: {strategy} (weight {weight}, required {required})")]
    InsufficientBalance {
        strategy: String,
        weight: u64,
        required: u64,
    },

    #[error("no computed status is defined for persisted status {status}")]
    UndefinedComputedStatus { status: PersistedStatus },

    #[error("invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    #[error("proposal {id} is not open for voting (status: {status})")]
    ProposalNotLive { id: ProposalId, status: String },

    #[error("cannot move proposal from {from} to {to}")]
    InvalidTransition {
        from: PersistedStatus,
        to: PersistedStatus,
    },
}
