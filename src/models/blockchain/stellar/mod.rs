//! Stellar specific data structures.
//!
//! This module contains the RPC shaped ledger and transaction models the extractor reads,
//! the decoded contract value tree, and the event and invocation records it produces.

mod event;
mod invocation;
mod ledger;
mod meta;
mod transaction;
mod value;

pub use event::{
	ContractEvent as StellarContractEvent, DiagnosticEvent as StellarDiagnosticEvent,
	EventMeta as StellarEventMeta, EventWireType as StellarEventWireType,
};
pub use invocation::{
	AuthType as StellarAuthType, ContractCall as StellarContractCall,
	ContractInvocation as StellarContractInvocation, StateChange as StellarStateChange,
	StateChangeOperation as StellarStateChangeOperation,
};
pub use ledger::{Ledger as StellarLedger, LedgerInfo as StellarLedgerInfo};
pub use meta::{
	pair_ledger_entry_changes, EntryChange, EntryChangeKind, LedgerTransaction,
	TransactionEvents,
};
pub use transaction::{
	DecodedTransaction as StellarDecodedTransaction, Transaction as StellarTransaction,
	TransactionInfo as StellarTransactionInfo, TRANSACTION_STATUS_SUCCESS,
};
pub use value::{
	format_timepoint, AddressKind, DecodedAddress, DecodedContractInstance, DecodedMapEntry,
	DecodedValue,
};
