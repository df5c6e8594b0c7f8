//! Stellar contract event and invocation extraction.
//!
//! This library decodes Stellar ledgers into a stream of typed records:
//!
//! - Contract events, with their topics and data decoded from XDR and classified
//! - Contract invocations, with arguments, the cross-contract call graph taken from the
//!   authorization trees, and contract storage changes
//!
//! Records are delivered through a bounded channel that honours a shutdown signal.
//!
//! # Module Structure
//!
//! - `bootstrap`: Process wiring for the binary
//! - `models`: Input ledger models, output records and configuration
//! - `services`: The extraction pipeline
//! - `utils`: Logging, metrics, parsing and test helpers

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
