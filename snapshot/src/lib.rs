//! Balance oracle for the agora voting platform.
//!
//! Votes are weighted by an address's token holdings at the block height the
//! proposal was created at. Those balances come from an external snapshot
//! service:
//! - `GET /latest-blockheight` → the most recent snapshot
//! - `GET /balance-at-blockheight/{address}/{height}` → a [`Balance`](agora_types::Balance)
//!
//! In development and test modes no request is made and fixed dummy values
//! are returned instead.

pub mod client;
pub mod error;
pub mod oracle;

pub use client::SnapshotClient;
pub use error::SnapshotError;
pub use oracle::{BalanceOracle, Snapshot};
