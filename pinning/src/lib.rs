//! Content pinning for the agora voting platform.
//!
//! Proposal and vote payloads are pinned to IPFS through a pinning service
//! so their content identifier can be stored alongside the record.

pub mod client;
pub mod error;
pub mod pinner;

pub use client::{PinataClient, PinataCredentials};
pub use error::PinningError;
pub use pinner::{Pin, Pinner};
