use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("conflicting update: {0}")]
    Conflict(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<bincode::Error> for LmdbError {
    fn from(e: bincode::Error) -> Self {
        LmdbError::Serialization(e.to_string())
    }
}

impl From<LmdbError> for agora_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::NotFound(key) => agora_store::StoreError::NotFound(key),
            LmdbError::Duplicate(key) => agora_store::StoreError::Duplicate(key),
            LmdbError::Conflict(msg) => agora_store::StoreError::Conflict(msg),
            LmdbError::Serialization(msg) => agora_store::StoreError::Serialization(msg),
            LmdbError::Heed(msg) => agora_store::StoreError::Backend(msg),
        }
    }
}
