//! Recut Common Utilities
//!
//! Shared infrastructure for all Recut crates:
//! - Error types and result aliases
//! - Edit clock used to stamp document modification times
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
