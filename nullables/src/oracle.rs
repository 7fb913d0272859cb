//! Nullable balance oracle: canned balances, no network.

use agora_snapshot::{BalanceOracle, Snapshot, SnapshotError};
use agora_types::{Address, Balance};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// A balance oracle answering from a table set up by the test.
///
/// Addresses without an entry hold nothing.
pub struct NullBalanceOracle {
    /// address → (staking, primary account)
    balances: Mutex<HashMap<Address, (u64, u64)>>,
    block_height: Mutex<u64>,
    unreachable: Mutex<bool>,
    /// Every (address, block height) queried, in order.
    queries: Mutex<Vec<(Address, u64)>>,
}

impl NullBalanceOracle {
    pub fn new(block_height: u64) -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            block_height: Mutex::new(block_height),
            unreachable: Mutex::new(false),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn set_balance(&self, address: &Address, staking: u64, primary: u64) {
        self.balances
            .lock()
            .unwrap()
            .insert(address.clone(), (staking, primary));
    }

    pub fn set_block_height(&self, block_height: u64) {
        *self.block_height.lock().unwrap() = block_height;
    }

    /// Make every subsequent call fail as if the service were down.
    pub fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.lock().unwrap() = unreachable;
    }

    /// Balance lookups made so far (for assertions).
    pub fn queries(&self) -> Vec<(Address, u64)> {
        self.queries.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), SnapshotError> {
        if *self.unreachable.lock().unwrap() {
            Err(SnapshotError::Unreachable("null oracle is offline".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for NullBalanceOracle {
    fn default() -> Self {
        Self::new(Snapshot::DUMMY_BLOCK_HEIGHT)
    }
}

#[async_trait]
impl BalanceOracle for NullBalanceOracle {
    async fn balance_at(
        &self,
        address: &Address,
        block_height: u64,
    ) -> Result<Balance, SnapshotError> {
        self.check()?;
        self.queries
            .lock()
            .unwrap()
            .push((address.clone(), block_height));
        let (staking, primary) = self
            .balances
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or((0, 0));
        Ok(Balance::new(address.clone(), block_height, staking, primary))
    }

    async fn latest_snapshot(&self) -> Result<Snapshot, SnapshotError> {
        self.check()?;
        let block_height = *self.block_height.lock().unwrap();
        Ok(Snapshot {
            id: format!("null-{block_height}"),
            block_height,
            started: None,
            finished: None,
        })
    }
}
