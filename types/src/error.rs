//! Errors raised while constructing shared value types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid account address: {0}")]
    InvalidAddress(String),
}
