//! Abstract storage traits for the agora voting platform.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod error;
pub mod proposal;
pub mod query;
pub mod vote;

pub use error::StoreError;
pub use proposal::ProposalStore;
pub use query::{ListQuery, Page, SortOrder};
pub use vote::VoteStore;
