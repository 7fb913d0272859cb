//! Snapshot-time token balances.
//!
//! Amounts are raw integer token units; a [`Balance`] is fetched from the
//! balance oracle for one address at one block height and never stored.

use serde::{Deserialize, Serialize};

use crate::Address;

/// An address's token holdings at a specific block height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    #[serde(rename = "addr")]
    pub address: Address,
    #[serde(default)]
    pub block_height: u64,
    #[serde(default)]
    pub staking_balance: u64,
    #[serde(default)]
    pub primary_account_balance: u64,
}

impl Balance {
    pub fn new(
        address: Address,
        block_height: u64,
        staking_balance: u64,
        primary_account_balance: u64,
    ) -> Self {
        Self {
            address,
            block_height,
            staking_balance,
            primary_account_balance,
        }
    }

    /// The fixed all-zero balance handed out when live balance checks are bypassed.
    pub fn dummy(address: Address, block_height: u64) -> Self {
        Self::new(address, block_height, 0, 0)
    }

    /// Staking plus primary-account balance, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.staking_balance
            .saturating_add(self.primary_account_balance)
    }
}
