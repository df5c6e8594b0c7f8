//! Core services implementing the business logic.
//!
//! - `extractor`: Decoding of Stellar ledgers into contract event and invocation records

pub mod extractor;
