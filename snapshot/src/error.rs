use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("HTTP request to snapshot service failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from snapshot service: {0}")]
    InvalidResponse(String),

    #[error("snapshot service unreachable: {0}")]
    Unreachable(String),
}
