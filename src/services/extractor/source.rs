//! Ledger input boundary.
//!
//! The extractor reads ledgers through [`LedgerSource`], which hands out a fresh
//! [`TransactionReader`] for each pass over the ledger's transactions. [`StellarLedger`]
//! implements the source for ledgers shaped like the Stellar RPC responses, decoding the
//! base64 XDR of each transaction as it is read.

use async_trait::async_trait;
use std::collections::HashMap;
use stellar_xdr::curr::{
	FeeBumpTransactionInnerTx, InnerTransactionResult, InnerTransactionResultResult,
	MuxedAccount, Operation, OperationResult, TransactionEnvelope, TransactionMeta,
	TransactionResult, TransactionResultResult,
};

use crate::{
	models::{
		pair_ledger_entry_changes, EntryChange, LedgerTransaction, StellarLedger,
		StellarTransaction, StellarTransactionInfo, TransactionEvents,
	},
	services::extractor::error::ExtractorError,
};

/// Sequential reader over the transactions of one ledger
#[async_trait]
pub trait TransactionReader: Send {
	/// Reads the next transaction.
	///
	/// # Returns
	/// `Ok(None)` once the ledger is exhausted. An error aborts the ledger.
	async fn read(&mut self) -> Result<Option<LedgerTransaction>, ExtractorError>;
}

/// A ledger the extractor can process
pub trait LedgerSource: Send + Sync {
	/// Ledger sequence number
	fn sequence(&self) -> u32;

	/// Close time in unix seconds.
	///
	/// # Errors
	/// `ReadError` if the ledger's close time cannot be read
	fn closed_at(&self) -> Result<i64, ExtractorError>;

	/// Opens a new reader positioned at the first transaction.
	fn transaction_reader(&self) -> Result<Box<dyn TransactionReader>, ExtractorError>;
}

impl LedgerSource for StellarLedger {
	fn sequence(&self) -> u32 {
		StellarLedger::sequence(self)
	}

	fn closed_at(&self) -> Result<i64, ExtractorError> {
		self.close_time().ok_or_else(|| {
			ExtractorError::read_error(
				"Unparseable ledger close time",
				None,
				Some(HashMap::from([
					("ledger".to_string(), self.sequence.to_string()),
					("close_time".to_string(), self.ledger_close_time.clone()),
				])),
			)
		})
	}

	fn transaction_reader(&self) -> Result<Box<dyn TransactionReader>, ExtractorError> {
		Ok(Box::new(RpcTransactionReader::new(self.transactions.clone())))
	}
}

/// Reads transactions from an RPC shaped ledger, decoding them lazily
pub struct RpcTransactionReader {
	transactions: std::vec::IntoIter<StellarTransactionInfo>,
	next_index: u32,
}

impl RpcTransactionReader {
	pub fn new(transactions: Vec<StellarTransactionInfo>) -> Self {
		Self {
			transactions: transactions.into_iter(),
			next_index: 0,
		}
	}
}

#[async_trait]
impl TransactionReader for RpcTransactionReader {
	async fn read(&mut self) -> Result<Option<LedgerTransaction>, ExtractorError> {
		let Some(info) = self.transactions.next() else {
			return Ok(None);
		};
		let index = self.next_index;
		self.next_index += 1;

		ledger_transaction_from_rpc(index, &StellarTransaction::from(info)).map(Some)
	}
}

/// Converts a decoded RPC transaction into the extractor's per-transaction view.
///
/// # Arguments
/// * `index` - Position of the transaction in its ledger
/// * `transaction` - The transaction, as produced by `StellarTransaction::from`
///
/// # Errors
/// `ReadError` if the envelope is missing, or if any XDR field that is present failed to
/// decode
pub fn ledger_transaction_from_rpc(
	index: u32,
	transaction: &StellarTransaction,
) -> Result<LedgerTransaction, ExtractorError> {
	let metadata = || {
		Some(HashMap::from([(
			"tx_hash".to_string(),
			transaction.hash().clone(),
		)]))
	};
	let malformed = |field: &str| {
		ExtractorError::read_error(format!("Malformed {} XDR", field), None, metadata())
	};

	let decoded = transaction.decoded().ok_or_else(|| {
		ExtractorError::read_error("Transaction XDR was not decoded", None, metadata())
	})?;

	let envelope = match (&decoded.envelope, &transaction.envelope_xdr) {
		(Some(envelope), _) => envelope,
		(None, Some(_)) => return Err(malformed("envelope")),
		(None, None) => {
			return Err(ExtractorError::read_error(
				"Transaction has no envelope",
				None,
				metadata(),
			))
		}
	};
	let (source_account, operations) = envelope_parts(envelope);

	let (successful, operation_results) = match (&decoded.result, &transaction.result_xdr) {
		(Some(result), _) => result_parts(result),
		(None, Some(_)) => return Err(malformed("result")),
		(None, None) => (transaction.is_successful(), Vec::new()),
	};

	let (events, diagnostic_events, changes) =
		match (&decoded.meta, &transaction.result_meta_xdr) {
			(Some(meta), _) => meta_parts(meta),
			(None, Some(_)) => return Err(malformed("result meta")),
			(None, None) => (None, Vec::new(), Vec::new()),
		};

	Ok(LedgerTransaction {
		index,
		hash: transaction.hash().clone(),
		successful,
		source_account,
		operations,
		operation_results,
		events,
		diagnostic_events,
		changes,
	})
}

fn envelope_parts(envelope: &TransactionEnvelope) -> (MuxedAccount, Vec<Operation>) {
	match envelope {
		TransactionEnvelope::TxV0(env) => (
			MuxedAccount::Ed25519(env.tx.source_account_ed25519.clone()),
			env.tx.operations.to_vec(),
		),
		TransactionEnvelope::Tx(env) => (env.tx.source_account.clone(), env.tx.operations.to_vec()),
		TransactionEnvelope::TxFeeBump(env) => match &env.tx.inner_tx {
			FeeBumpTransactionInnerTx::Tx(inner) => (
				inner.tx.source_account.clone(),
				inner.tx.operations.to_vec(),
			),
		},
	}
}

fn result_parts(result: &TransactionResult) -> (bool, Vec<OperationResult>) {
	match &result.result {
		TransactionResultResult::TxSuccess(results) => (true, results.to_vec()),
		TransactionResultResult::TxFailed(results) => (false, results.to_vec()),
		TransactionResultResult::TxFeeBumpInnerSuccess(pair)
		| TransactionResultResult::TxFeeBumpInnerFailed(pair) => inner_result_parts(&pair.result),
		_ => (false, Vec::new()),
	}
}

fn inner_result_parts(result: &InnerTransactionResult) -> (bool, Vec<OperationResult>) {
	match &result.result {
		InnerTransactionResultResult::TxSuccess(results) => (true, results.to_vec()),
		InnerTransactionResultResult::TxFailed(results) => (false, results.to_vec()),
		_ => (false, Vec::new()),
	}
}

type MetaParts = (
	Option<TransactionEvents>,
	Vec<stellar_xdr::curr::DiagnosticEvent>,
	Vec<EntryChange>,
);

/// Splits transaction meta into Soroban events, diagnostic events and paired changes.
///
/// Changes are `tx_changes_before`, then each operation's changes, then
/// `tx_changes_after`. Soroban meta only exists from V3 on, and all of its contract events
/// belong to the single `InvokeHostFunction` operation at index 0.
fn meta_parts(meta: &TransactionMeta) -> MetaParts {
	match meta {
		TransactionMeta::V0(operations) => (
			None,
			Vec::new(),
			pair_ledger_entry_changes(operations.iter().flat_map(|op| op.changes.0.iter())),
		),
		TransactionMeta::V1(v1) => (
			None,
			Vec::new(),
			pair_ledger_entry_changes(
				v1.tx_changes
					.0
					.iter()
					.chain(v1.operations.iter().flat_map(|op| op.changes.0.iter())),
			),
		),
		TransactionMeta::V2(v2) => (
			None,
			Vec::new(),
			pair_ledger_entry_changes(
				v2.tx_changes_before
					.0
					.iter()
					.chain(v2.operations.iter().flat_map(|op| op.changes.0.iter()))
					.chain(v2.tx_changes_after.0.iter()),
			),
		),
		TransactionMeta::V3(v3) => {
			let changes = pair_ledger_entry_changes(
				v3.tx_changes_before
					.0
					.iter()
					.chain(v3.operations.iter().flat_map(|op| op.changes.0.iter()))
					.chain(v3.tx_changes_after.0.iter()),
			);
			match &v3.soroban_meta {
				Some(soroban) => (
					Some(TransactionEvents {
						operation_events: vec![soroban.events.to_vec()],
						transaction_events: Vec::new(),
					}),
					soroban.diagnostic_events.to_vec(),
					changes,
				),
				None => (None, Vec::new(), changes),
			}
		}
	}
}
