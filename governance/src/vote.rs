//! Votes.

use agora_types::{Address, CompositeSignature, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

/// A vote as submitted by a voter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVote {
    pub proposal_id: ProposalId,
    #[serde(rename = "addr")]
    pub voter: Address,
    pub choice: String,
    #[serde(default)]
    pub composite_signatures: Vec<CompositeSignature>,
}

impl NewVote {
    pub fn pin_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "proposalId": self.proposal_id,
            "addr": self.voter,
            "choice": self.choice,
            "compositeSignatures": self.composite_signatures,
        })
    }
}

/// A recorded vote.
///
/// `weight` is `None` when balance checks were bypassed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub proposal_id: ProposalId,
    #[serde(rename = "addr")]
    pub voter: Address,
    pub choice: String,
    pub weight: Option<u64>,
    pub block_height: u64,
    pub cid: Option<String>,
    pub created_at: Timestamp,
    pub composite_signatures: Vec<CompositeSignature>,
}

impl Vote {
    pub fn from_new(
        vote: NewVote,
        weight: Option<u64>,
        block_height: u64,
        cid: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            proposal_id: vote.proposal_id,
            voter: vote.voter,
            choice: vote.choice,
            weight,
            block_height,
            cid,
            created_at,
            composite_signatures: vote.composite_signatures,
        }
    }
}
