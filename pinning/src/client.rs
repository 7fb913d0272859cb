//! HTTP client for the Pinata pinning service.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;

use crate::{Pin, Pinner, PinningError};

/// Public Pinata API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.pinata.cloud";

/// Default timeout for pinning requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// API key pair sent with every request.
#[derive(Clone, Debug, Default)]
pub struct PinataCredentials {
    pub api_key: String,
    pub secret_api_key: String,
}

/// Error body returned by the service on non-2xx responses.
///
/// Depending on the endpoint the reason is in `message`, in `error` as a
/// string, or in `error.details` / `error.reason`.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl ErrorResponse {
    fn reason(self) -> Option<String> {
        if let Some(message) = self.message.filter(|m| !m.is_empty()) {
            return Some(message);
        }
        match self.error? {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Object(map) => ["details", "reason"]
                .iter()
                .find_map(|k| map.get(*k).and_then(|v| v.as_str()).map(str::to_string)),
            _ => None,
        }
    }
}

/// Client for the Pinata pinning API.
pub struct PinataClient {
    base_url: String,
    credentials: PinataCredentials,
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
}

impl PinataClient {
    pub fn new(credentials: PinataCredentials) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, credentials, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        credentials: PinataCredentials,
        timeout: Duration,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            http_client,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Pin, PinningError> {
        let response = request
            .header("pinata_api_key", &self.credentials.api_key)
            .header("pinata_secret_api_key", &self.credentials.secret_api_key)
            .send()
            .await
            .map_err(|e| PinningError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let reason = serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .and_then(ErrorResponse::reason);
            tracing::debug!(status = status.as_u16(), ?reason, "pinning request rejected");
            return Err(match reason {
                Some(reason) => PinningError::Remote(reason),
                None => PinningError::Status(status.as_u16()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| PinningError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl Pinner for PinataClient {
    async fn pin_json(&self, payload: &serde_json::Value) -> Result<Pin, PinningError> {
        let url = format!("{}/pinning/pinJSONToIPFS", self.base_url);
        let pin = self.send(self.http_client.post(&url).json(payload)).await?;
        tracing::debug!(cid = %pin.ipfs_hash, "pinned JSON payload");
        Ok(pin)
    }

    async fn pin_file(&self, bytes: Vec<u8>, file_name: &str) -> Result<Pin, PinningError> {
        let url = format!("{}/pinning/pinFileToIPFS", self.base_url);
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let pin = self.send(self.http_client.post(&url).multipart(form)).await?;
        tracing::debug!(cid = %pin.ipfs_hash, file_name, "pinned file");
        Ok(pin)
    }
}
