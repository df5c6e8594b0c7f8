//! Metrics module for the application.
//!
//! - This module contains the global Prometheus registry.
//! - Defines the extraction counters updated by the ledger pass.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

lazy_static! {
	/// Global Prometheus registry.
	///
	/// This registry holds all metrics defined in this module and is used
	/// to gather metrics for exposure.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Counter Vector of records sent to the consumer, labelled by record type.
	pub static ref RECORDS_EMITTED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("extractor_records_emitted_total", "Records emitted to the consumer"),
			&["record_type"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Counter Vector of records dropped during construction, labelled by reason.
	pub static ref RECORDS_SKIPPED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("extractor_records_skipped_total", "Records skipped during extraction"),
			&["reason"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Counter of ledgers processed to completion.
	pub static ref LEDGERS_PROCESSED: IntCounter = {
		let counter = IntCounter::new(
			"extractor_ledgers_processed_total",
			"Ledgers processed to completion"
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Counter Vector of ledger passes that ended early, labelled by error kind.
	pub static ref LEDGERS_FAILED: IntCounterVec = {
		let counter = IntCounterVec::new(
			Opts::new("extractor_ledgers_failed_total", "Ledger passes that ended with an error"),
			&["kind"]
		).unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};
}

/// Gather all metrics and encode into the provided format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}
