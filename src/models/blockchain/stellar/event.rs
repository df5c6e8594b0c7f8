//! Contract event records produced by the extractor.

use serde::Serialize;
use stellar_xdr::curr::ContractEventType;

use super::value::DecodedValue;

/// Coordinates shared by every record emitted for a ledger
///
/// `(ledger_sequence, tx_index, operation_index, event_index)` reflects ledger order. It is
/// only unique together with the record type: an invocation always has `event_index` 0 and
/// shares its coordinates with the first event of its operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventMeta {
	/// Sequence number of the containing ledger
	pub ledger_sequence: u32,

	/// Ledger close time in unix seconds
	pub closed_at: i64,

	/// Hex encoded transaction hash
	pub tx_hash: String,

	/// Position of the transaction within its ledger, starting at 0
	pub tx_index: u32,

	/// Position of the operation within its transaction, -1 for transaction-level events
	pub operation_index: i32,

	/// Position of the event within its operation's event list, 0 for invocations
	pub event_index: u32,

	/// Whether the containing transaction succeeded
	pub in_successful_tx: bool,

	/// Network passphrase of the ledger
	pub network_passphrase: String,
}

/// Event kind as tagged on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventWireType {
	Contract,
	System,
	Diagnostic,
}

impl From<ContractEventType> for EventWireType {
	fn from(event_type: ContractEventType) -> Self {
		match event_type {
			ContractEventType::Contract => EventWireType::Contract,
			ContractEventType::System => EventWireType::System,
			ContractEventType::Diagnostic => EventWireType::Diagnostic,
		}
	}
}

/// A diagnostic event nested under a contract event or invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticEvent {
	pub contract_id: String,
	pub wire_type: EventWireType,
	pub detected_event_type: String,
	pub topics: Vec<DecodedValue>,
	pub data: DecodedValue,
	pub in_successful_contract_call: bool,
}

/// A decoded contract event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractEvent {
	#[serde(flatten)]
	pub meta: EventMeta,

	/// `C...` strkey of the emitting contract
	pub contract_id: String,

	pub wire_type: EventWireType,

	/// Event type derived from the first symbol topic
	pub detected_event_type: String,

	pub topics: Vec<DecodedValue>,

	pub data: DecodedValue,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub diagnostic_events: Vec<DiagnosticEvent>,
}
