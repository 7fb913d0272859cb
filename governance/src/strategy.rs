//! Voting strategies.
//!
//! A strategy names which balance components count toward an address's
//! voting weight.

use agora_types::Balance;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::GovernanceError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Staking plus primary-account balance.
    #[default]
    TokenWeightedDefault,
    /// Staking balance only.
    StakedTokenWeightedDefault,
    /// Staking plus primary-account balance, capped by the proposal's max weight.
    TokenWeightedCapped,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Self::TokenWeightedDefault,
        Self::StakedTokenWeightedDefault,
        Self::TokenWeightedCapped,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::TokenWeightedDefault => "token-weighted-default",
            Self::StakedTokenWeightedDefault => "staked-token-weighted-default",
            Self::TokenWeightedCapped => "token-weighted-capped",
        }
    }

    /// Raw voting weight for `balance`. Never clamped here.
    pub fn weight(&self, balance: &Balance) -> u64 {
        match self {
            Self::TokenWeightedDefault | Self::TokenWeightedCapped => balance.total(),
            Self::StakedTokenWeightedDefault => balance.staking_balance,
        }
    }

    pub fn is_capped(&self) -> bool {
        matches!(self, Self::TokenWeightedCapped)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| GovernanceError::UnsupportedStrategy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::Address;

    fn balance(staking: u64, primary: u64) -> Balance {
        Balance::new(Address::parse("0xf8d6e0586b0a20c7").unwrap(), 10, staking, primary)
    }

    #[test]
    fn weights_follow_strategy() {
        let b = balance(500, 100);
        assert_eq!(Strategy::TokenWeightedDefault.weight(&b), 600);
        assert_eq!(Strategy::StakedTokenWeightedDefault.weight(&b), 500);
        assert_eq!(Strategy::TokenWeightedCapped.weight(&b), 600);
    }

    #[test]
    fn names_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn unknown_name_is_unsupported() {
        assert_eq!(
            "quadratic".parse::<Strategy>(),
            Err(GovernanceError::UnsupportedStrategy("quadratic".into()))
        );
    }
}
