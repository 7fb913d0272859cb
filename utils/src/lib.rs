//! Shared utilities for the agora voting platform.

pub mod logging;

pub use logging::{init_logging, LogFormat};
