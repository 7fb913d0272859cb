use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("governance error: {0}")]
    Governance(#[from] agora_governance::GovernanceError),

    #[error("store error: {0}")]
    Store(#[from] agora_store::StoreError),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] agora_snapshot::SnapshotError),

    #[error("pinning error: {0}")]
    Pinning(#[from] agora_pinning::PinningError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
