//! Nullable infrastructure for deterministic testing.
//!
//! All external collaborators (clock, record store, balance oracle, pinning
//! service) are abstracted behind traits. This crate provides test-friendly
//! implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod oracle;
pub mod pinning;
pub mod store;

pub use clock::NullClock;
pub use oracle::NullBalanceOracle;
pub use pinning::NullPinner;
pub use store::NullStore;
