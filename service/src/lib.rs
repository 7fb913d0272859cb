//! Proposal and vote orchestration.
//!
//! [`ProposalService`] ties the pure rules in `agora-governance` to the
//! record store, the balance oracle and the pinning service. Every
//! operation reads the clock once and passes that instant down, so a single
//! call never sees two different "now"s.

pub mod config;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use service::ProposalService;
