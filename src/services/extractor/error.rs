//! Extractor error types and handling.
//!
//! Covers the four ways a ledger pass can go wrong: the transaction stream failing, a single
//! record that cannot be encoded, cancellation, and the record consumer going away.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

/// Represents possible errors that can occur while extracting records from a ledger
#[derive(ThisError, Debug)]
pub enum ExtractorError {
	/// The transaction stream could not be read. Fatal for the ledger.
	#[error("Read error: {0}")]
	ReadError(ErrorContext),

	/// A single record could not be encoded (usually an address). The record is skipped.
	#[error("Encoding error: {0}")]
	EncodingError(ErrorContext),

	/// Shutdown was signalled while records were still being emitted
	#[error("Cancelled: {0}")]
	Cancelled(ErrorContext),

	/// The receiving half of the record channel was dropped
	#[error("Channel closed: {0}")]
	ChannelClosed(ErrorContext),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl ExtractorError {
	// Read error
	pub fn read_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ReadError(ErrorContext::new_with_log(msg, source, metadata))
	}

	// Encoding errors are expected on odd ledgers and are logged by the caller at debug level
	pub fn encoding_error(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::EncodingError(ErrorContext::new(msg, source, metadata))
	}

	// Cancellation
	pub fn cancelled(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Cancelled(ErrorContext::new(msg, source, metadata))
	}

	// Channel closed
	pub fn channel_closed(
		msg: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ChannelClosed(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Returns true if this error only affects a single record.
	pub fn is_recoverable(&self) -> bool {
		matches!(self, Self::EncodingError(_))
	}
}

impl TraceableError for ExtractorError {
	fn trace_id(&self) -> String {
		match self {
			Self::ReadError(ctx) => ctx.trace_id.clone(),
			Self::EncodingError(ctx) => ctx.trace_id.clone(),
			Self::Cancelled(ctx) => ctx.trace_id.clone(),
			Self::ChannelClosed(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
