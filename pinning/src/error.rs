use thiserror::Error;

#[derive(Debug, Error)]
pub enum PinningError {
    /// The service rejected the request and said why.
    #[error("{0}")]
    Remote(String),

    #[error("unknown error, status code: {0}")]
    Status(u16),

    #[error("HTTP request to pinning service failed: {0}")]
    RequestFailed(String),

    #[error("invalid response from pinning service: {0}")]
    InvalidResponse(String),
}
