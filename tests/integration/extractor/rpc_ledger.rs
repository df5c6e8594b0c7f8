//! Integration tests for ledgers in the RPC response shape, decoded from base64 XDR.

use stellar_contract_extractor::{
	models::{
		DecodedValue, ExtractedRecord, ExtractorConfig, StellarEventWireType, StellarLedger,
		StellarLedgerInfo, StellarStateChangeOperation, TESTNET_NETWORK_PASSPHRASE,
	},
	services::extractor::{encode_contract_id, ExtractorError, LedgerEventExtractor},
	utils::tests::builders::stellar::{
		contract_address, contract_data_entry, contract_hash, diagnostic_event, invoke_operation,
		soroban_meta, successful_invoke_result, symbol, transaction_envelope, transaction_info,
		StellarContractEventBuilder,
	},
};
use stellar_xdr::curr::{ContractEventType, LedgerEntryChange, ScVal};
use tokio::sync::{mpsc, watch};

fn run_config(
	config: ExtractorConfig,
) -> (
	LedgerEventExtractor,
	mpsc::Receiver<ExtractedRecord>,
	watch::Sender<bool>,
) {
	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let (extractor, receiver) = LedgerEventExtractor::new(config, shutdown_rx);
	(extractor, receiver, shutdown_tx)
}

fn drain(receiver: &mut mpsc::Receiver<ExtractedRecord>) -> Vec<ExtractedRecord> {
	let mut records = Vec::new();
	while let Ok(record) = receiver.try_recv() {
		records.push(record);
	}
	records
}

/// Ledger 500 with one Soroban transaction: a `transfer` on contract 1 that emits one
/// contract event, one system event and one diagnostic event, and updates a balance entry.
fn soroban_ledger() -> StellarLedger {
	let envelope = transaction_envelope(vec![invoke_operation(
		contract_address(1),
		"transfer",
		vec![symbol("alice"), ScVal::I64(5)],
		vec![],
	)]);

	let events = vec![
		StellarContractEventBuilder::new()
			.contract(1)
			.symbol_topic("transfer")
			.data(ScVal::I64(5))
			.build(),
		StellarContractEventBuilder::new()
			.contract(1)
			.event_type(ContractEventType::System)
			.symbol_topic("upgrade")
			.build(),
	];
	let diagnostics = vec![diagnostic_event(
		StellarContractEventBuilder::new()
			.contract(1)
			.event_type(ContractEventType::Diagnostic)
			.symbol_topic("fn_return")
			.build(),
		true,
	)];
	let balance = symbol("Balance");
	let changes = vec![
		LedgerEntryChange::State(contract_data_entry(
			contract_address(1),
			balance.clone(),
			ScVal::I64(10),
		)),
		LedgerEntryChange::Updated(contract_data_entry(
			contract_address(1),
			balance,
			ScVal::I64(5),
		)),
	];

	let meta = soroban_meta(events, diagnostics, changes);
	let result = successful_invoke_result(1);

	StellarLedger::from(StellarLedgerInfo {
		hash: "ledger-hash".to_string(),
		sequence: 500,
		ledger_close_time: "1700000000".to_string(),
		transactions: vec![transaction_info("soroban-tx", &envelope, Some(&result), Some(&meta))],
	})
}

#[tokio::test]
async fn test_rpc_ledger_end_to_end() {
	let (extractor, mut receiver, _shutdown) =
		run_config(ExtractorConfig::new(TESTNET_NETWORK_PASSPHRASE));

	let summary = extractor.process_ledger(&soroban_ledger()).await.unwrap();
	assert_eq!(summary.ledger_sequence, 500);
	assert_eq!(summary.events_emitted, 1);
	assert_eq!(summary.invocations_emitted, 1);

	let records = drain(&mut receiver);
	assert_eq!(records.len(), 2);
	let contract_id = encode_contract_id(&contract_hash(1));

	let ExtractedRecord::ContractEvent(event) = &records[0] else {
		panic!("expected an event first, got {:?}", records[0]);
	};
	assert_eq!(event.contract_id, contract_id);
	assert_eq!(event.wire_type, StellarEventWireType::Contract);
	assert_eq!(event.detected_event_type, "transfer");
	assert_eq!(event.data, DecodedValue::I64(5));
	assert_eq!(event.meta.closed_at, 1_700_000_000);
	assert_eq!(event.meta.tx_hash, "soroban-tx");
	assert_eq!(event.meta.network_passphrase, TESTNET_NETWORK_PASSPHRASE);
	assert_eq!(event.diagnostic_events.len(), 1);
	assert_eq!(event.diagnostic_events[0].detected_event_type, "fn_return");

	let ExtractedRecord::ContractInvocation(invocation) = &records[1] else {
		panic!("expected an invocation second, got {:?}", records[1]);
	};
	assert_eq!(invocation.contract_id, contract_id);
	assert_eq!(invocation.function_name, "transfer");
	assert!(invocation.successful);
	assert_eq!(
		invocation.arguments,
		vec![DecodedValue::Symbol("alice".to_string()), DecodedValue::I64(5)]
	);
	assert!(invocation.invoking_account.starts_with('G'));
	assert_eq!(invocation.state_changes.len(), 1);

	let change = &invocation.state_changes[0];
	assert_eq!(change.contract_id, contract_id);
	assert_eq!(change.operation, StellarStateChangeOperation::Update);
	assert_eq!(change.old_value.as_deref(), Some("10"));
	assert_eq!(change.new_value.as_deref(), Some("5"));
}

#[tokio::test]
async fn test_rpc_ledger_without_diagnostics() {
	let config = ExtractorConfig {
		include_diagnostic_events: false,
		..ExtractorConfig::new(TESTNET_NETWORK_PASSPHRASE)
	};
	let (extractor, mut receiver, _shutdown) = run_config(config);

	extractor.process_ledger(&soroban_ledger()).await.unwrap();

	let records = drain(&mut receiver);
	assert_eq!(records.len(), 2);
	for record in &records {
		let diagnostics = match record {
			ExtractedRecord::ContractEvent(event) => &event.diagnostic_events,
			ExtractedRecord::ContractInvocation(invocation) => &invocation.diagnostic_events,
		};
		assert!(diagnostics.is_empty());
	}

	let line = serde_json::to_value(&records[0]).unwrap();
	assert!(line.get("diagnostic_events").is_none());
}

#[tokio::test]
async fn test_rpc_ledger_with_malformed_meta_is_read_error() {
	let (extractor, mut receiver, _shutdown) =
		run_config(ExtractorConfig::new(TESTNET_NETWORK_PASSPHRASE));

	let mut ledger = soroban_ledger().0;
	ledger.transactions[0].result_meta_xdr = Some("AAAA////".to_string());

	let result = extractor.process_ledger(&StellarLedger::from(ledger)).await;
	assert!(matches!(result, Err(ExtractorError::ReadError(_))));
	assert!(drain(&mut receiver).is_empty());
}

#[tokio::test]
async fn test_record_json_shape() {
	let (extractor, mut receiver, _shutdown) =
		run_config(ExtractorConfig::new(TESTNET_NETWORK_PASSPHRASE));
	extractor.process_ledger(&soroban_ledger()).await.unwrap();

	let records = drain(&mut receiver);
	let event = serde_json::to_value(&records[0]).unwrap();
	assert_eq!(event["record_type"], "contract_event");
	assert_eq!(event["ledger_sequence"], 500);
	assert_eq!(event["operation_index"], 0);
	assert_eq!(event["data"]["type"], "i64");
	assert_eq!(event["data"]["value"], 5);

	let invocation = serde_json::to_value(&records[1]).unwrap();
	assert_eq!(invocation["record_type"], "contract_invocation");
	assert_eq!(invocation["function_name"], "transfer");
	assert_eq!(invocation["state_changes"][0]["operation"], "update");
}

#[tokio::test]
async fn test_unparseable_close_time_aborts_ledger() {
	let (extractor, mut receiver, _shutdown) =
		run_config(ExtractorConfig::new(TESTNET_NETWORK_PASSPHRASE));

	let mut ledger = soroban_ledger().0;
	ledger.ledger_close_time = "not-a-time".to_string();

	let result = extractor.process_ledger(&StellarLedger::from(ledger)).await;
	assert!(matches!(result, Err(ExtractorError::ReadError(_))));
	assert!(drain(&mut receiver).is_empty());
}
