//! Heartify Common Utilities
//!
//! Shared infrastructure for all Heartify crates:
//! - Error types and result aliases
//! - Wall-clock formatting and the per-view clock ticker
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
