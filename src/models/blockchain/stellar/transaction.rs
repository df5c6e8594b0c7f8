//! Stellar transaction data structures.
//!
//! Note: These structures are based on the Stellar RPC implementation:
//! <https://github.com/stellar/stellar-rpc/blob/main/cmd/stellar-rpc/internal/methods/get_transactions.go>

use std::ops::Deref;

use base64::Engine;
use serde::{Deserialize, Serialize};
use stellar_xdr::curr::{Limits, ReadXdr, TransactionEnvelope, TransactionMeta, TransactionResult};

/// RPC status of a transaction that was applied successfully
pub const TRANSACTION_STATUS_SUCCESS: &str = "SUCCESS";

/// Information about a Stellar transaction
///
/// This structure represents the response from the Stellar RPC endpoint
/// and matches the format defined in the stellar-rpc repository.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TransactionInfo {
	/// Current status of the transaction
	pub status: String,

	/// Hash of the transaction
	#[serde(rename = "txHash")]
	pub transaction_hash: String,

	/// Order of this transaction within its ledger (1-based)
	#[serde(rename = "applicationOrder", default)]
	pub application_order: i32,

	/// Whether this is a fee bump transaction
	#[serde(rename = "feeBump", default)]
	pub fee_bump: bool,

	/// Base64-encoded XDR of the transaction envelope
	#[serde(rename = "envelopeXdr", skip_serializing_if = "Option::is_none")]
	pub envelope_xdr: Option<String>,

	/// Base64-encoded XDR of the transaction result
	#[serde(rename = "resultXdr", skip_serializing_if = "Option::is_none")]
	pub result_xdr: Option<String>,

	/// Base64-encoded XDR of the transaction metadata
	#[serde(rename = "resultMetaXdr", skip_serializing_if = "Option::is_none")]
	pub result_meta_xdr: Option<String>,

	/// Sequence number of the containing ledger
	#[serde(default)]
	pub ledger: u32,

	/// Timestamp when the ledger was closed
	#[serde(rename = "createdAt", default)]
	pub ledger_close_time: i64,

	/// Decoded transaction data
	#[serde(skip)]
	pub decoded: Option<DecodedTransaction>,
}

/// Decoded transaction data including envelope, result, and metadata
///
/// A field is `None` when the RPC omitted it or when it could not be decoded; compare
/// against the raw `*_xdr` field to tell the two apart.
#[derive(Debug, Clone, Default)]
pub struct DecodedTransaction {
	/// Decoded transaction envelope containing the original transaction data
	pub envelope: Option<TransactionEnvelope>,

	/// Decoded transaction result containing success/failure and operation results
	pub result: Option<TransactionResult>,

	/// Decoded transaction metadata containing events and ledger changes
	pub meta: Option<TransactionMeta>,
}

/// Wrapper around TransactionInfo that provides additional functionality
#[derive(Debug, Clone)]
pub struct Transaction(pub TransactionInfo);

impl Transaction {
	/// Get the transaction hash
	pub fn hash(&self) -> &String {
		&self.0.transaction_hash
	}

	/// Whether the RPC reported the transaction as successful
	pub fn is_successful(&self) -> bool {
		self.0.status == TRANSACTION_STATUS_SUCCESS
	}

	/// Get the decoded transaction data if available
	pub fn decoded(&self) -> Option<&DecodedTransaction> {
		self.0.decoded.as_ref()
	}

	/// Decode base64-encoded XDR data into raw bytes
	fn decode_xdr(xdr: &str) -> Option<Vec<u8>> {
		base64::engine::general_purpose::STANDARD.decode(xdr).ok()
	}
}

impl From<TransactionInfo> for Transaction {
	fn from(tx: TransactionInfo) -> Self {
		let decoded = DecodedTransaction {
			envelope: tx
				.envelope_xdr
				.as_ref()
				.and_then(|xdr| Self::decode_xdr(xdr))
				.and_then(|bytes| TransactionEnvelope::from_xdr(bytes, Limits::none()).ok()),

			result: tx
				.result_xdr
				.as_ref()
				.and_then(|xdr| Self::decode_xdr(xdr))
				.and_then(|bytes| TransactionResult::from_xdr(bytes, Limits::none()).ok()),

			meta: tx
				.result_meta_xdr
				.as_ref()
				.and_then(|xdr| Self::decode_xdr(xdr))
				.and_then(|bytes| TransactionMeta::from_xdr(bytes, Limits::none()).ok()),
		};

		Self(TransactionInfo {
			decoded: Some(decoded),
			..tx
		})
	}
}

impl Deref for Transaction {
	type Target = TransactionInfo;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
