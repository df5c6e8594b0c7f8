//! Construction of event and invocation records from one transaction.

use std::collections::HashMap;
use stellar_xdr::curr::{
	ContractEvent as XdrContractEvent, ContractEventBody, DiagnosticEvent as XdrDiagnosticEvent,
	HostFunction, InvokeContractArgs, InvokeHostFunctionOp, InvokeHostFunctionResult, Operation,
	OperationResult, OperationResultTr, ScVal,
};

use crate::{
	models::{
		LedgerTransaction, StellarContractEvent, StellarContractInvocation,
		StellarDiagnosticEvent, StellarEventMeta, StellarEventWireType,
	},
	services::extractor::{
		auth_tree::extract_contract_calls,
		classifier::detect_event_type,
		decoder::{
			contract_id_from_address, decode_sc_val, decode_sc_vals, encode_contract_id,
			muxed_account_to_address,
		},
		error::ExtractorError,
		state_changes::extract_state_changes,
	},
};

/// Function name reported when neither the call nor its arguments name one
pub const UNKNOWN_FUNCTION_NAME: &str = "unknown";

/// Operation index used for events that belong to the whole transaction
pub const TRANSACTION_LEVEL_OPERATION_INDEX: i32 = -1;

/// Ledger level facts shared by every record built from one transaction
#[derive(Debug, Clone, Copy)]
pub struct TransactionContext<'a> {
	pub ledger_sequence: u32,
	pub closed_at: i64,
	pub network_passphrase: &'a str,
	pub transaction: &'a LedgerTransaction,
	pub in_successful_tx: bool,
}

impl TransactionContext<'_> {
	/// Builds the record metadata for the given coordinates.
	pub fn meta(&self, operation_index: i32, event_index: u32) -> StellarEventMeta {
		StellarEventMeta {
			ledger_sequence: self.ledger_sequence,
			closed_at: self.closed_at,
			tx_hash: self.transaction.hash.clone(),
			tx_index: self.transaction.index,
			operation_index,
			event_index,
			in_successful_tx: self.in_successful_tx,
			network_passphrase: self.network_passphrase.to_string(),
		}
	}

	fn error_metadata(&self, operation_index: i32) -> Option<HashMap<String, String>> {
		Some(HashMap::from([
			("ledger".to_string(), self.ledger_sequence.to_string()),
			("tx_hash".to_string(), self.transaction.hash.clone()),
			("operation_index".to_string(), operation_index.to_string()),
		]))
	}
}

fn event_parts(event: &XdrContractEvent) -> (&[ScVal], &ScVal) {
	match &event.body {
		ContractEventBody::V0(body) => (body.topics.as_slice(), &body.data),
	}
}

/// Decodes the diagnostic events that can be attributed to a contract.
///
/// Diagnostic events without a contract id are dropped.
pub fn build_diagnostic_events(events: &[XdrDiagnosticEvent]) -> Vec<StellarDiagnosticEvent> {
	events
		.iter()
		.filter_map(|diagnostic| {
			let contract_id = diagnostic.event.contract_id.as_ref()?;
			let (topics, data) = event_parts(&diagnostic.event);
			Some(StellarDiagnosticEvent {
				contract_id: encode_contract_id(contract_id),
				wire_type: StellarEventWireType::from(diagnostic.event.type_),
				detected_event_type: detect_event_type(topics),
				topics: decode_sc_vals(topics),
				data: decode_sc_val(data),
				in_successful_contract_call: diagnostic.in_successful_contract_call,
			})
		})
		.collect()
}

/// Builds a contract event record.
///
/// # Arguments
/// * `ctx` - The transaction the event belongs to
/// * `event` - The raw event
/// * `operation_index` - Index of the emitting operation, or -1 for transaction-level events
/// * `event_index` - Position of the event in its list
/// * `diagnostic_events` - Diagnostic events to nest under the record
///
/// # Errors
/// `EncodingError` if the event carries no contract id
pub fn build_contract_event(
	ctx: &TransactionContext<'_>,
	event: &XdrContractEvent,
	operation_index: i32,
	event_index: u32,
	diagnostic_events: Vec<StellarDiagnosticEvent>,
) -> Result<StellarContractEvent, ExtractorError> {
	let contract_id = event.contract_id.as_ref().ok_or_else(|| {
		ExtractorError::encoding_error(
			"Contract event has no contract id",
			None,
			ctx.error_metadata(operation_index),
		)
	})?;
	let (topics, data) = event_parts(event);

	Ok(StellarContractEvent {
		meta: ctx.meta(operation_index, event_index),
		contract_id: encode_contract_id(contract_id),
		wire_type: StellarEventWireType::from(event.type_),
		detected_event_type: detect_event_type(topics),
		topics: decode_sc_vals(topics),
		data: decode_sc_val(data),
		diagnostic_events,
	})
}

/// Picks the function name of an invocation.
///
/// Falls back to the first argument when the name is empty and that argument is a symbol.
pub fn resolve_function_name(args: &InvokeContractArgs) -> String {
	let name = args.function_name.to_string();
	if !name.is_empty() {
		return name;
	}
	match args.args.first() {
		Some(ScVal::Symbol(sym)) => sym.to_string(),
		_ => UNKNOWN_FUNCTION_NAME.to_string(),
	}
}

/// Whether an operation result reports a successful host function invocation.
pub fn invoke_succeeded(result: Option<&OperationResult>) -> bool {
	matches!(
		result,
		Some(OperationResult::OpInner(OperationResultTr::InvokeHostFunction(
			InvokeHostFunctionResult::Success(_)
		)))
	)
}

/// Builds a contract invocation record for an `InvokeHostFunction` operation.
///
/// The invoking account is the operation source, falling back to the transaction source.
/// Host functions other than contract invocation produce a record with an empty contract
/// id and function name.
///
/// # Errors
/// `EncodingError` if the invoked address is not a contract
pub fn build_contract_invocation(
	ctx: &TransactionContext<'_>,
	operation_index: usize,
	operation: &Operation,
	invoke: &InvokeHostFunctionOp,
	diagnostic_events: Vec<StellarDiagnosticEvent>,
) -> Result<StellarContractInvocation, ExtractorError> {
	let op_index = i32::try_from(operation_index).unwrap_or(i32::MAX);
	let invoking_account = muxed_account_to_address(
		operation
			.source_account
			.as_ref()
			.unwrap_or(&ctx.transaction.source_account),
	);

	let (contract_id, function_name, arguments) = match &invoke.host_function {
		HostFunction::InvokeContract(args) => {
			let contract_id = contract_id_from_address(&args.contract_address).ok_or_else(|| {
				ExtractorError::encoding_error(
					"Invoked address is not a contract",
					None,
					ctx.error_metadata(op_index),
				)
			})?;
			(contract_id, resolve_function_name(args), decode_sc_vals(&args.args))
		}
		_ => (String::new(), String::new(), Vec::new()),
	};

	let primary_contract = (!contract_id.is_empty()).then_some(contract_id.as_str());
	let contract_calls = extract_contract_calls(&invoke.auth, primary_contract);

	Ok(StellarContractInvocation {
		meta: ctx.meta(op_index, 0),
		successful: invoke_succeeded(ctx.transaction.operation_results.get(operation_index)),
		contract_calls,
		state_changes: extract_state_changes(&ctx.transaction.changes),
		contract_id,
		function_name,
		invoking_account,
		arguments,
		diagnostic_events,
	})
}
