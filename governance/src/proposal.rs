//! Proposals and their read model.

use agora_types::{Address, CommunityId, CompositeSignature, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::status::{compute_status, is_live, ComputedStatus, PersistedStatus};
use crate::{GovernanceError, Strategy};

/// Input for creating a proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    pub community_id: CommunityId,
    pub name: String,
    pub choices: Vec<String>,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_balance: Option<u64>,
    pub creator: Address,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    #[serde(default = "default_initial_status")]
    pub status: PersistedStatus,
    #[serde(default)]
    pub composite_signatures: Vec<CompositeSignature>,
}

fn default_initial_status() -> PersistedStatus {
    PersistedStatus::Published
}

impl NewProposal {
    /// Reject definitions that could never be voted on sensibly.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.name.trim().is_empty() {
            return Err(GovernanceError::InvalidProposal("name is empty".into()));
        }
        if self.choices.is_empty() {
            return Err(GovernanceError::InvalidProposal("no choices given".into()));
        }
        let mut seen = HashSet::new();
        for choice in &self.choices {
            if choice.trim().is_empty() {
                return Err(GovernanceError::InvalidProposal("empty choice label".into()));
            }
            if !seen.insert(choice.as_str()) {
                return Err(GovernanceError::InvalidProposal(format!(
                    "duplicate choice: {choice}"
                )));
            }
        }
        if self.end_time <= self.start_time {
            return Err(GovernanceError::InvalidProposal(format!(
                "end time {} is not after start time {}",
                self.end_time, self.start_time
            )));
        }
        if self.max_weight == Some(0) {
            return Err(GovernanceError::InvalidProposal(
                "max weight must be positive".into(),
            ));
        }
        if let Some(name) = &self.strategy {
            name.parse::<Strategy>()?;
        }
        if !matches!(
            self.status,
            PersistedStatus::Draft | PersistedStatus::Published
        ) {
            return Err(GovernanceError::InvalidProposal(format!(
                "cannot create a proposal as {}",
                self.status
            )));
        }
        Ok(())
    }

    /// The document pinned to content storage when the proposal is created.
    pub fn pin_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "communityId": self.community_id,
            "name": self.name,
            "choices": self.choices,
            "body": self.body,
            "strategy": self.strategy,
            "maxWeight": self.max_weight,
            "minBalance": self.min_balance,
            "creatorAddr": self.creator,
            "startTime": self.start_time,
            "endTime": self.end_time,
            "compositeSignatures": self.composite_signatures,
        })
    }

    /// Promote to a stored record once the snapshot height and content id are known.
    pub fn into_proposal(
        self,
        block_height: u64,
        cid: Option<String>,
        created_at: Timestamp,
    ) -> Proposal {
        Proposal {
            id: ProposalId::new(0),
            community_id: self.community_id,
            name: self.name,
            choices: self.choices,
            body: self.body,
            strategy: self.strategy,
            max_weight: self.max_weight,
            min_balance: self.min_balance,
            creator: self.creator,
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
            created_at,
            block_height,
            cid,
            composite_signatures: self.composite_signatures,
        }
    }
}

/// A stored proposal.
///
/// `id` is assigned by the record store on creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: ProposalId,
    pub community_id: CommunityId,
    pub name: String,
    pub choices: Vec<String>,
    pub body: String,
    pub strategy: Option<String>,
    pub max_weight: Option<u64>,
    pub min_balance: Option<u64>,
    pub creator: Address,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub status: PersistedStatus,
    pub created_at: Timestamp,
    pub block_height: u64,
    pub cid: Option<String>,
    pub composite_signatures: Vec<CompositeSignature>,
}

impl Proposal {
    pub fn computed_status(&self, now: Timestamp) -> Option<ComputedStatus> {
        compute_status(self.status, self.start_time, self.end_time, now)
    }

    /// Whether votes are accepted at `now`.
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.status == PersistedStatus::Published && is_live(self.start_time, self.end_time, now)
    }

    /// The configured strategy name; proposals without one are token weighted.
    pub fn strategy_name(&self) -> &str {
        self.strategy
            .as_deref()
            .unwrap_or_else(|| Strategy::default().name())
    }

    pub fn strategy(&self) -> Result<Strategy, GovernanceError> {
        self.strategy_name().parse()
    }

    pub fn validate_choice(&self, choice: &str) -> Result<(), GovernanceError> {
        if self.choices.iter().any(|c| c == choice) {
            Ok(())
        } else {
            Err(GovernanceError::InvalidChoice(format!(
                "{choice} is not a choice on proposal {}",
                self.id
            )))
        }
    }
}

/// A proposal as returned to readers: annotated with its computed status
/// at the time of the read and its vote count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalView {
    #[serde(flatten)]
    pub proposal: Proposal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_status: Option<ComputedStatus>,
    pub total_votes: u64,
}

impl ProposalView {
    pub fn new(proposal: Proposal, now: Timestamp, total_votes: u64) -> Self {
        let computed_status = proposal.computed_status(now);
        Self {
            proposal,
            computed_status,
            total_votes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewProposal {
        NewProposal {
            community_id: CommunityId::new(1),
            name: "Fund the grants round".into(),
            choices: vec!["yes".into(), "no".into()],
            body: "<p>details</p>".into(),
            strategy: Some("token-weighted-default".into()),
            max_weight: None,
            min_balance: None,
            creator: Address::parse("0xf8d6e0586b0a20c7").unwrap(),
            start_time: Timestamp::new(1_000),
            end_time: Timestamp::new(2_000),
            status: PersistedStatus::Published,
            composite_signatures: Vec::new(),
        }
    }

    #[test]
    fn valid_definition_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn rejects_bad_definitions() {
        let mut p = draft();
        p.choices.clear();
        assert!(p.validate().is_err());

        let mut p = draft();
        p.choices = vec!["yes".into(), "yes".into()];
        assert!(p.validate().is_err());

        let mut p = draft();
        p.end_time = p.start_time;
        assert!(p.validate().is_err());

        let mut p = draft();
        p.status = PersistedStatus::Closed;
        assert!(p.validate().is_err());

        let mut p = draft();
        p.strategy = Some("token-weighted-capped".into());
        p.max_weight = Some(0);
        assert!(matches!(p.validate(), Err(GovernanceError::InvalidProposal(_))));
    }

    #[test]
    fn rejects_unknown_strategy() {
        let mut p = draft();
        p.strategy = Some("one-person-one-vote".into());
        assert_eq!(
            p.validate(),
            Err(GovernanceError::UnsupportedStrategy("one-person-one-vote".into()))
        );
    }

    #[test]
    fn missing_strategy_defaults_to_token_weighted() {
        let mut p = draft();
        p.strategy = None;
        let stored = p.into_proposal(5, None, Timestamp::new(1));
        assert_eq!(stored.strategy(), Ok(Strategy::TokenWeightedDefault));
    }

    #[test]
    fn view_annotates_computed_status() {
        let stored = draft().into_proposal(5, Some("cid".into()), Timestamp::new(1));
        let view = ProposalView::new(stored.clone(), Timestamp::new(1_500), 3);
        assert_eq!(view.computed_status, Some(ComputedStatus::Active));
        assert_eq!(view.proposal.status, PersistedStatus::Published);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["computedStatus"], "active");
        assert_eq!(json["status"], "published");
        assert_eq!(json["totalVotes"], 3);
    }

    #[test]
    fn drafts_are_never_live() {
        let mut p = draft();
        p.status = PersistedStatus::Draft;
        let stored = p.into_proposal(5, None, Timestamp::new(1));
        assert!(!stored.is_live(Timestamp::new(1_500)));
        assert_eq!(stored.computed_status(Timestamp::new(1_500)), None);
    }

    #[test]
    fn choice_must_exist() {
        let stored = draft().into_proposal(5, None, Timestamp::new(1));
        assert!(stored.validate_choice("yes").is_ok());
        assert!(matches!(
            stored.validate_choice("maybe"),
            Err(GovernanceError::InvalidChoice(_))
        ));
    }
}
