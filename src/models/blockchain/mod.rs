//! Blockchain-specific model implementations.
//!
//! Only Stellar is supported. The records the extractor streams out are defined here as a
//! single tagged union so that one channel can carry every record kind.

use serde::Serialize;

pub mod stellar;

/// A record produced by the extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "record_type", rename_all = "snake_case")]
pub enum ExtractedRecord {
	/// A decoded contract event
	///
	/// # Note
	/// Box is used here to equalize the enum variants
	ContractEvent(Box<stellar::StellarContractEvent>),
	/// A decoded contract invocation
	///
	/// # Note
	/// Box is used here to equalize the enum variants
	ContractInvocation(Box<stellar::StellarContractInvocation>),
}

impl ExtractedRecord {
	/// Label used for metrics and logs
	pub fn record_type(&self) -> &'static str {
		match self {
			ExtractedRecord::ContractEvent(_) => "contract_event",
			ExtractedRecord::ContractInvocation(_) => "contract_invocation",
		}
	}

	/// Shared ledger coordinates of the record
	pub fn meta(&self) -> &stellar::StellarEventMeta {
		match self {
			ExtractedRecord::ContractEvent(event) => &event.meta,
			ExtractedRecord::ContractInvocation(invocation) => &invocation.meta,
		}
	}
}

/// Counts reported for one processed ledger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
	pub ledger_sequence: u32,
	pub events_emitted: usize,
	pub invocations_emitted: usize,
	pub records_skipped: usize,
}
