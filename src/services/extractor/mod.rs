//! Contract event and invocation extraction.
//!
//! Turns Stellar ledgers into a stream of decoded records:
//! - XDR value decoding and event classification
//! - Cross-contract call graphs from authorization trees
//! - Contract storage state changes
//! - The ledger pass and its bounded, cancellable output channel

mod auth_tree;
mod classifier;
mod decoder;
mod emitter;
mod error;
mod records;
mod service;
mod source;
mod state_changes;

pub use auth_tree::{auth_type_of, extract_contract_calls};
pub use classifier::{canonical_event_type, detect_event_type, UNKNOWN_EVENT_TYPE};
pub use decoder::{
	combine_i128, combine_i256, combine_u128, combine_u256, contract_id_from_address,
	decode_sc_val, decode_sc_vals, decode_xdr_value, encode_account_id, encode_contract_id,
	encode_sc_address, muxed_account_to_address, parse_i128_hex, parse_u128_hex,
};
pub use emitter::RecordEmitter;
pub use error::ExtractorError;
pub use records::{
	build_contract_event, build_contract_invocation, build_diagnostic_events,
	invoke_succeeded, resolve_function_name, TransactionContext,
	TRANSACTION_LEVEL_OPERATION_INDEX, UNKNOWN_FUNCTION_NAME,
};
pub use service::LedgerEventExtractor;
pub use source::{ledger_transaction_from_rpc, LedgerSource, RpcTransactionReader, TransactionReader};
pub use state_changes::extract_state_changes;
