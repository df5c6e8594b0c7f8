//! Domain models and data structures for contract record extraction.
//!
//! - `blockchain`: Stellar ledger input models and the records produced from them
//! - `config`: Configuration loading and validation

mod blockchain;
mod config;

pub use blockchain::{ExtractedRecord, LedgerSummary};

pub use blockchain::stellar::{
	format_timepoint, pair_ledger_entry_changes, AddressKind, DecodedAddress,
	DecodedContractInstance, DecodedMapEntry, DecodedValue, EntryChange, EntryChangeKind,
	LedgerTransaction, StellarAuthType, StellarContractCall, StellarContractEvent,
	StellarContractInvocation, StellarDecodedTransaction, StellarDiagnosticEvent,
	StellarEventMeta, StellarEventWireType, StellarLedger, StellarLedgerInfo,
	StellarStateChange, StellarStateChangeOperation, StellarTransaction, StellarTransactionInfo,
	TransactionEvents, TRANSACTION_STATUS_SUCCESS,
};

pub use config::{
	ConfigError, ConfigLoader, ExtractorConfig, DEFAULT_CHANNEL_CAPACITY,
	NETWORK_PASSPHRASE_ENV, PUBLIC_NETWORK_PASSPHRASE, TESTNET_NETWORK_PASSPHRASE,
};
