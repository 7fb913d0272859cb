//! The pinning service seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::PinningError;

/// A pinned object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pub pin_size: u64,
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "isDuplicate", default)]
    pub is_duplicate: bool,
}

/// Stores content and returns its content identifier.
#[async_trait]
pub trait Pinner: Send + Sync {
    async fn pin_json(&self, payload: &serde_json::Value) -> Result<Pin, PinningError>;

    async fn pin_file(&self, bytes: Vec<u8>, file_name: &str) -> Result<Pin, PinningError>;
}
