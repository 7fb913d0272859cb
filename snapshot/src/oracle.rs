//! The balance oracle seam.

use agora_types::{Address, Balance};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::SnapshotError;

/// A completed balance snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub block_height: u64,
    #[serde(default)]
    pub started: Option<String>,
    #[serde(default)]
    pub finished: Option<String>,
}

impl Snapshot {
    /// Block height reported while the oracle is bypassed.
    pub const DUMMY_BLOCK_HEIGHT: u64 = 1_000_000;

    pub fn dummy() -> Self {
        Self {
            id: "1".to_string(),
            block_height: Self::DUMMY_BLOCK_HEIGHT,
            started: None,
            finished: None,
        }
    }
}

/// Source of snapshot-time balances.
#[async_trait]
pub trait BalanceOracle: Send + Sync {
    /// Balances held by `address` at `block_height`.
    async fn balance_at(&self, address: &Address, block_height: u64)
        -> Result<Balance, SnapshotError>;

    /// The most recent completed snapshot.
    async fn latest_snapshot(&self) -> Result<Snapshot, SnapshotError>;
}
