//! Per-transaction view of a ledger used as the extractor's input.
//!
//! A [`LedgerTransaction`] flattens the parts of envelope, result and meta XDR that record
//! extraction needs, independent of where the ledger came from.

use stellar_xdr::curr::{
	ContractEvent as XdrContractEvent, DiagnosticEvent as XdrDiagnosticEvent, LedgerEntry,
	LedgerEntryChange, MuxedAccount, Operation, OperationResult, Uint256,
};

/// Soroban events of a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionEvents {
	/// Events grouped by operation index
	pub operation_events: Vec<Vec<XdrContractEvent>>,

	/// Events that belong to the transaction as a whole
	pub transaction_events: Vec<XdrContractEvent>,
}

/// Kind of a paired ledger entry change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryChangeKind {
	Created,
	Updated,
	Removed,
}

/// A ledger entry change with its pre and post snapshots
///
/// `Created` carries only `post`, `Removed` only `pre`, `Updated` both. Either snapshot
/// may be missing when the meta did not record a prior `State` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryChange {
	pub kind: EntryChangeKind,
	pub pre: Option<LedgerEntry>,
	pub post: Option<LedgerEntry>,
}

/// A single transaction of a ledger, in the shape the extractor consumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTransaction {
	/// Position in the ledger, starting at 0
	pub index: u32,

	/// Hex encoded transaction hash
	pub hash: String,

	/// Whether the transaction succeeded
	pub successful: bool,

	/// Source account of the (inner) transaction
	pub source_account: MuxedAccount,

	pub operations: Vec<Operation>,

	/// Operation results, positionally aligned with `operations` when present
	pub operation_results: Vec<OperationResult>,

	/// Soroban events, `None` for transactions without Soroban meta
	pub events: Option<TransactionEvents>,

	pub diagnostic_events: Vec<XdrDiagnosticEvent>,

	/// Paired ledger entry changes in meta order
	pub changes: Vec<EntryChange>,
}

impl LedgerTransaction {
	/// Creates a transaction with no operations, events or changes.
	pub fn new(index: u32, hash: impl Into<String>, successful: bool) -> Self {
		Self {
			index,
			hash: hash.into(),
			successful,
			source_account: MuxedAccount::Ed25519(Uint256([0; 32])),
			operations: Vec::new(),
			operation_results: Vec::new(),
			events: None,
			diagnostic_events: Vec::new(),
			changes: Vec::new(),
		}
	}

	/// Returns true if the transaction carries Soroban meta.
	pub fn is_soroban(&self) -> bool {
		self.events.is_some()
	}
}

/// Pairs raw ledger entry changes into pre/post snapshots.
///
/// A `State` change records the entry as it was before the next `Updated` or `Removed`
/// change, so it becomes that change's `pre`. A `State` without a follower is dropped.
///
/// # Arguments
/// * `changes` - Raw changes in meta order
///
/// # Returns
/// Paired changes, one per `Created`/`Updated`/`Removed`, in input order
pub fn pair_ledger_entry_changes<'a>(
	changes: impl IntoIterator<Item = &'a LedgerEntryChange>,
) -> Vec<EntryChange> {
	let mut paired = Vec::new();
	let mut pending_state: Option<LedgerEntry> = None;

	for change in changes {
		match change {
			LedgerEntryChange::State(entry) => pending_state = Some(entry.clone()),
			LedgerEntryChange::Created(entry) => {
				pending_state = None;
				paired.push(EntryChange {
					kind: EntryChangeKind::Created,
					pre: None,
					post: Some(entry.clone()),
				});
			}
			LedgerEntryChange::Updated(entry) => paired.push(EntryChange {
				kind: EntryChangeKind::Updated,
				pre: pending_state.take(),
				post: Some(entry.clone()),
			}),
			LedgerEntryChange::Removed(_) => paired.push(EntryChange {
				kind: EntryChangeKind::Removed,
				pre: pending_state.take(),
				post: None,
			}),
		}
	}

	paired
}
