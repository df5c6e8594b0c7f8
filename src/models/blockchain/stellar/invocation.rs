//! Contract invocation records produced by the extractor.

use serde::Serialize;

use super::{event::DiagnosticEvent, event::EventMeta, value::DecodedValue};

/// How the root of an authorization tree was authorized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
	/// Authorized by the transaction source account
	SourceAccount,
	/// Authorized by an address credential
	Contract,
}

/// One cross-contract call edge reconstructed from an authorization tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCall {
	pub from_contract: String,
	pub to_contract: String,
	pub function: String,
	pub arguments: Vec<DecodedValue>,
	/// Depth of the callee node in its tree, roots are 0
	pub call_depth: u32,
	pub auth_type: AuthType,
	/// Structural position of the edge across the operation's authorization entries.
	/// Not a verified on-chain execution order.
	pub execution_order: u32,
}

/// Kind of a contract data change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateChangeOperation {
	Create,
	Update,
	Delete,
}

/// A contract data entry before and after a transaction
///
/// Keys and values are stringified decoded values. `Create` never carries an old value and
/// `Delete` never carries a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateChange {
	pub contract_id: String,
	pub key: String,
	pub old_value: Option<String>,
	pub new_value: Option<String>,
	pub operation: StateChangeOperation,
}

/// A decoded `InvokeHostFunction` operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractInvocation {
	#[serde(flatten)]
	pub meta: EventMeta,

	/// `C...` strkey of the invoked contract, empty for non-invoke host functions
	pub contract_id: String,

	pub function_name: String,

	/// `G...` strkey of the operation (or transaction) source account
	pub invoking_account: String,

	pub arguments: Vec<DecodedValue>,

	/// Whether the operation itself succeeded
	pub successful: bool,

	pub contract_calls: Vec<ContractCall>,

	pub state_changes: Vec<StateChange>,

	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub diagnostic_events: Vec<DiagnosticEvent>,
}
