//! Stellar ledger data structures.
//!
//! Note: These structures follow the Stellar RPC `getLedgers` / `getTransactions` responses:
//! <https://github.com/stellar/stellar-rpc/blob/main/cmd/stellar-rpc/internal/methods/get_ledgers.go>

use std::ops::Deref;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::transaction::TransactionInfo;

/// Information about a Stellar ledger and the transactions it applied
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LedgerInfo {
	/// Hash of the ledger
	#[serde(rename = "hash", default)]
	pub hash: String,

	/// Sequence number of the ledger
	#[serde(rename = "sequence")]
	pub sequence: u32,

	/// Close time, either unix seconds or an RFC 3339 timestamp
	#[serde(rename = "ledgerCloseTime")]
	pub ledger_close_time: String,

	/// Transactions in application order
	#[serde(rename = "transactions", default)]
	pub transactions: Vec<TransactionInfo>,
}

/// Wrapper around LedgerInfo that implements additional functionality
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Ledger(pub LedgerInfo);

impl Ledger {
	/// Get the ledger sequence
	pub fn sequence(&self) -> u32 {
		self.0.sequence
	}

	/// Get the close time in unix seconds, if the RPC value can be parsed
	pub fn close_time(&self) -> Option<i64> {
		let raw = self.0.ledger_close_time.trim();
		raw.parse::<i64>().ok().or_else(|| {
			DateTime::parse_from_rfc3339(raw)
				.ok()
				.map(|dt| dt.timestamp())
		})
	}
}

impl From<LedgerInfo> for Ledger {
	fn from(info: LedgerInfo) -> Self {
		Self(info)
	}
}

impl Deref for Ledger {
	type Target = LedgerInfo;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
