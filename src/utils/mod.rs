//! Utility modules for common functionality.
//!
//! - logging: Logging setup and the error context shared by all error types
//! - metrics: Prometheus counters for extraction
//! - parsing: Parsing utilities for command line values
//! - tests: Test builders for Stellar XDR fixtures

pub mod logging;
pub mod metrics;
pub mod parsing;

pub use parsing::*;
