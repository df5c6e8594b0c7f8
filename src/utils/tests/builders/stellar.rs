//! Test helper utilities for Stellar ledger data
//!
//! - Address, value and ledger entry constructors
//! - Operation, envelope, result and meta constructors
//! - `transaction_info`: RPC shaped transaction with base64 encoded XDR
//! - `StellarContractEventBuilder`: Builder for raw contract events

use base64::Engine;
use std::str::FromStr;
use stellar_xdr::curr::{
	AccountEntry, AccountEntryExt, AccountId, ContractCodeEntry, ContractCodeEntryExt,
	ContractDataDurability, ContractDataEntry, ContractEvent, ContractEventBody,
	ContractEventType, ContractEventV0, DiagnosticEvent, ExtensionPoint, Hash, HostFunction,
	InvokeContractArgs, InvokeHostFunctionOp, InvokeHostFunctionResult, LedgerEntry,
	LedgerEntryChange, LedgerEntryChanges, LedgerEntryData, LedgerEntryExt, Limits, Memo,
	MuxedAccount, Operation, OperationBody, OperationMeta, OperationResult, OperationResultTr,
	Preconditions, PublicKey, ScAddress, ScSymbol, ScVal, SequenceNumber,
	SorobanAddressCredentials, SorobanAuthorizationEntry, SorobanAuthorizedFunction,
	SorobanAuthorizedInvocation, SorobanCredentials, SorobanTransactionMeta,
	SorobanTransactionMetaExt, StringM, Transaction as XdrTransaction, TransactionEnvelope,
	TransactionExt, TransactionMeta, TransactionMetaV3, TransactionResult, TransactionResultExt,
	Thresholds, TransactionResultResult, TransactionV1Envelope, TtlEntry, Uint256, VecM, WriteXdr,
};

use crate::models::{StellarTransactionInfo, TRANSACTION_STATUS_SUCCESS};

pub fn contract_hash(n: u8) -> Hash {
	Hash([n; 32])
}

pub fn contract_address(n: u8) -> ScAddress {
	ScAddress::Contract(contract_hash(n))
}

pub fn account_address(n: u8) -> ScAddress {
	ScAddress::Account(AccountId(PublicKey::PublicKeyTypeEd25519(Uint256([n; 32]))))
}

pub fn symbol(name: &str) -> ScVal {
	ScVal::Symbol(ScSymbol(StringM::from_str(name).unwrap()))
}

fn invoke_args(address: ScAddress, function: &str, args: Vec<ScVal>) -> InvokeContractArgs {
	InvokeContractArgs {
		contract_address: address,
		function_name: ScSymbol(StringM::from_str(function).unwrap()),
		args: args.try_into().unwrap(),
	}
}

/// Authorized contract function call with the given sub-invocations
pub fn invocation(
	address: ScAddress,
	function: &str,
	args: Vec<ScVal>,
	sub_invocations: Vec<SorobanAuthorizedInvocation>,
) -> SorobanAuthorizedInvocation {
	SorobanAuthorizedInvocation {
		function: SorobanAuthorizedFunction::ContractFn(invoke_args(address, function, args)),
		sub_invocations: sub_invocations.try_into().unwrap(),
	}
}

/// Authorization entry, signed by an address when `address_credentials` is set and by the
/// transaction source otherwise
pub fn auth_entry(
	address_credentials: bool,
	root_invocation: SorobanAuthorizedInvocation,
) -> SorobanAuthorizationEntry {
	let credentials = if address_credentials {
		SorobanCredentials::Address(SorobanAddressCredentials {
			address: account_address(0),
			nonce: 0,
			signature_expiration_ledger: 0,
			signature: ScVal::Void,
		})
	} else {
		SorobanCredentials::SourceAccount
	};
	SorobanAuthorizationEntry {
		credentials,
		root_invocation,
	}
}

/// `InvokeHostFunction` operation calling a contract, without an operation source
pub fn invoke_operation(
	address: ScAddress,
	function: &str,
	args: Vec<ScVal>,
	auth: Vec<SorobanAuthorizationEntry>,
) -> Operation {
	Operation {
		source_account: None,
		body: OperationBody::InvokeHostFunction(InvokeHostFunctionOp {
			host_function: HostFunction::InvokeContract(invoke_args(address, function, args)),
			auth: auth.try_into().unwrap(),
		}),
	}
}

pub fn transaction_envelope(operations: Vec<Operation>) -> TransactionEnvelope {
	TransactionEnvelope::Tx(TransactionV1Envelope {
		tx: XdrTransaction {
			source_account: MuxedAccount::Ed25519(Uint256([0; 32])),
			fee: 100,
			seq_num: SequenceNumber(1),
			cond: Preconditions::None,
			memo: Memo::None,
			operations: operations.try_into().unwrap(),
			ext: TransactionExt::V0,
		},
		signatures: VecM::default(),
	})
}

pub fn invoke_op_result() -> OperationResult {
	OperationResult::OpInner(OperationResultTr::InvokeHostFunction(
		InvokeHostFunctionResult::Success(Hash([0; 32])),
	))
}

pub fn failed_invoke_op_result() -> OperationResult {
	OperationResult::OpInner(OperationResultTr::InvokeHostFunction(
		InvokeHostFunctionResult::Trapped,
	))
}

/// Successful transaction result with `operations` successful invocations
pub fn successful_invoke_result(operations: usize) -> TransactionResult {
	TransactionResult {
		fee_charged: 100,
		result: TransactionResultResult::TxSuccess(
			vec![invoke_op_result(); operations].try_into().unwrap(),
		),
		ext: TransactionResultExt::V0,
	}
}

/// V3 transaction meta with Soroban events and a single operation's ledger changes
pub fn soroban_meta(
	events: Vec<ContractEvent>,
	diagnostic_events: Vec<DiagnosticEvent>,
	changes: Vec<LedgerEntryChange>,
) -> TransactionMeta {
	TransactionMeta::V3(TransactionMetaV3 {
		ext: ExtensionPoint::V0,
		tx_changes_before: LedgerEntryChanges(VecM::default()),
		operations: vec![OperationMeta {
			changes: LedgerEntryChanges(changes.try_into().unwrap()),
		}]
		.try_into()
		.unwrap(),
		tx_changes_after: LedgerEntryChanges(VecM::default()),
		soroban_meta: Some(SorobanTransactionMeta {
			ext: SorobanTransactionMetaExt::V0,
			events: events.try_into().unwrap(),
			return_value: ScVal::Void,
			diagnostic_events: diagnostic_events.try_into().unwrap(),
		}),
	})
}

fn encode<T: WriteXdr>(value: &T) -> String {
	base64::engine::general_purpose::STANDARD.encode(value.to_xdr(Limits::none()).unwrap())
}

/// RPC shaped transaction carrying the given XDR, reported as successful
pub fn transaction_info(
	hash: &str,
	envelope: &TransactionEnvelope,
	result: Option<&TransactionResult>,
	meta: Option<&TransactionMeta>,
) -> StellarTransactionInfo {
	StellarTransactionInfo {
		status: TRANSACTION_STATUS_SUCCESS.to_string(),
		transaction_hash: hash.to_string(),
		envelope_xdr: Some(encode(envelope)),
		result_xdr: result.map(encode),
		result_meta_xdr: meta.map(encode),
		..Default::default()
	}
}

/// Persistent contract data entry owned by `owner`
pub fn contract_data_entry(owner: ScAddress, key: ScVal, val: ScVal) -> LedgerEntry {
	LedgerEntry {
		last_modified_ledger_seq: 1,
		data: LedgerEntryData::ContractData(ContractDataEntry {
			ext: ExtensionPoint::V0,
			contract: owner,
			key,
			durability: ContractDataDurability::Persistent,
			val,
		}),
		ext: LedgerEntryExt::V0,
	}
}

fn ledger_entry(data: LedgerEntryData) -> LedgerEntry {
	LedgerEntry {
		last_modified_ledger_seq: 1,
		data,
		ext: LedgerEntryExt::V0,
	}
}

/// Time-to-live entry for the ledger key hashed to `[n; 32]`
pub fn ttl_entry(n: u8, live_until_ledger_seq: u32) -> LedgerEntry {
	ledger_entry(LedgerEntryData::Ttl(TtlEntry {
		key_hash: Hash([n; 32]),
		live_until_ledger_seq,
	}))
}

pub fn account_entry(n: u8, balance: i64) -> LedgerEntry {
	ledger_entry(LedgerEntryData::Account(AccountEntry {
		account_id: AccountId(PublicKey::PublicKeyTypeEd25519(Uint256([n; 32]))),
		balance,
		seq_num: SequenceNumber(1),
		num_sub_entries: 0,
		inflation_dest: None,
		flags: 0,
		home_domain: Default::default(),
		thresholds: Thresholds([1, 0, 0, 0]),
		signers: VecM::default(),
		ext: AccountEntryExt::V0,
	}))
}

pub fn contract_code_entry(n: u8) -> LedgerEntry {
	ledger_entry(LedgerEntryData::ContractCode(ContractCodeEntry {
		ext: ContractCodeEntryExt::V0,
		hash: Hash([n; 32]),
		code: vec![0x00, 0x61, 0x73, 0x6d].try_into().unwrap(),
	}))
}

pub fn diagnostic_event(event: ContractEvent, in_successful_contract_call: bool) -> DiagnosticEvent {
	DiagnosticEvent {
		in_successful_contract_call,
		event,
	}
}

/// Builder for raw contract events
///
/// Defaults to a `Contract` event from contract 1 with no topics and void data.
pub struct StellarContractEventBuilder {
	contract_id: Option<Hash>,
	type_: ContractEventType,
	topics: Vec<ScVal>,
	data: ScVal,
}

impl Default for StellarContractEventBuilder {
	fn default() -> Self {
		Self {
			contract_id: Some(contract_hash(1)),
			type_: ContractEventType::Contract,
			topics: Vec::new(),
			data: ScVal::Void,
		}
	}
}

impl StellarContractEventBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contract(mut self, n: u8) -> Self {
		self.contract_id = Some(contract_hash(n));
		self
	}

	pub fn event_type(mut self, type_: ContractEventType) -> Self {
		self.type_ = type_;
		self
	}

	pub fn topic(mut self, topic: ScVal) -> Self {
		self.topics.push(topic);
		self
	}

	pub fn symbol_topic(self, name: &str) -> Self {
		self.topic(symbol(name))
	}

	pub fn data(mut self, data: ScVal) -> Self {
		self.data = data;
		self
	}

	pub fn build(self) -> ContractEvent {
		ContractEvent {
			ext: ExtensionPoint::V0,
			contract_id: self.contract_id,
			type_: self.type_,
			body: ContractEventBody::V0(ContractEventV0 {
				topics: self.topics.try_into().unwrap(),
				data: self.data,
			}),
		}
	}
}
