//! HTTP client for the snapshot service.

use agora_governance::ExecutionMode;
use agora_types::{Address, Balance};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{BalanceOracle, Snapshot, SnapshotError};

/// Default timeout for snapshot requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the snapshot (balance oracle) service.
pub struct SnapshotClient {
    base_url: String,
    mode: ExecutionMode,
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
}

impl SnapshotClient {
    /// Create a client with default timeout settings.
    pub fn new(base_url: impl Into<String>, mode: ExecutionMode) -> Self {
        Self::with_timeout(base_url, mode, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        mode: ExecutionMode,
        timeout: Duration,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            mode,
            http_client,
        }
    }

    /// Don't hit the snapshot service outside production.
    fn bypass(&self) -> bool {
        self.mode.bypasses_balance_checks()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SnapshotError> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            tracing::debug!(error = %e, url, "snapshot http client error");
            if e.is_timeout() {
                SnapshotError::Unreachable(format!("request timed out: {e}"))
            } else if e.is_connect() {
                SnapshotError::Unreachable(format!("connection failed: {e}"))
            } else {
                SnapshotError::RequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), url, "snapshot request rejected");
            return Err(SnapshotError::RequestFailed(format!(
                "unknown snapshot error, status code: {}",
                response.status().as_u16()
            )));
        }

        response.json().await.map_err(|e| {
            tracing::debug!(error = %e, url, "snapshot response decode error");
            SnapshotError::InvalidResponse(e.to_string())
        })
    }
}

#[async_trait]
impl BalanceOracle for SnapshotClient {
    async fn balance_at(
        &self,
        address: &Address,
        block_height: u64,
    ) -> Result<Balance, SnapshotError> {
        if self.bypass() {
            return Ok(Balance::dummy(address.clone(), block_height));
        }
        let url = format!(
            "{}/balance-at-blockheight/{}/{}",
            self.base_url, address, block_height
        );
        self.get_json(&url).await
    }

    async fn latest_snapshot(&self) -> Result<Snapshot, SnapshotError> {
        if self.bypass() {
            return Ok(Snapshot::dummy());
        }
        let url = format!("{}/latest-blockheight", self.base_url);
        self.get_json(&url).await
    }
}
