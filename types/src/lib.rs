//! Fundamental types for the agora voting platform.
//!
//! This crate defines the value types shared across every other crate in the workspace:
//! account addresses, identifiers, snapshot balances, signatures and timestamps.

pub mod address;
pub mod balance;
pub mod error;
pub mod id;
pub mod signature;
pub mod time;

pub use address::Address;
pub use balance::Balance;
pub use error::TypesError;
pub use id::{CommunityId, ProposalId};
pub use signature::CompositeSignature;
pub use time::{Clock, SystemClock, Timestamp};
