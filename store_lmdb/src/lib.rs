//! LMDB storage backend for the agora voting platform.
//!
//! Implements the storage traits from `agora-store` using the `heed` LMDB bindings.
//! All stores share a single environment opened by [`LmdbEnvironment`].

pub mod environment;
pub mod error;
pub mod proposal;
pub mod vote;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use proposal::LmdbProposalStore;
pub use vote::LmdbVoteStore;
