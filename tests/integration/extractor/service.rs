//! Integration tests for the ledger pass over mocked ledger sources.

use crate::integration::mocks::{ledger_with, ledger_with_passes};
use stellar_contract_extractor::{
	models::{
		ExtractedRecord, ExtractorConfig, LedgerTransaction, StellarAuthType,
		TransactionEvents, TESTNET_NETWORK_PASSPHRASE,
	},
	services::extractor::{encode_contract_id, ExtractorError, LedgerEventExtractor},
	utils::tests::builders::stellar::{
		auth_entry, contract_address, contract_hash, invocation, invoke_op_result,
		invoke_operation, symbol, StellarContractEventBuilder,
	},
};
use stellar_xdr::curr::ScVal;
use tokio::sync::{mpsc, watch};

fn extractor() -> (
	LedgerEventExtractor,
	mpsc::Receiver<ExtractedRecord>,
	watch::Sender<bool>,
) {
	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let (extractor, receiver) =
		LedgerEventExtractor::new(ExtractorConfig::new(TESTNET_NETWORK_PASSPHRASE), shutdown_rx);
	(extractor, receiver, shutdown_tx)
}

fn drain(receiver: &mut mpsc::Receiver<ExtractedRecord>) -> Vec<ExtractedRecord> {
	let mut records = Vec::new();
	while let Ok(record) = receiver.try_recv() {
		records.push(record);
	}
	records
}

/// Successful transaction invoking `C.transfer`, authorized to call `T.transfer`
fn transfer_transaction(index: u32, hash: &str) -> LedgerTransaction {
	let mut tx = LedgerTransaction::new(index, hash, true);
	tx.operations = vec![invoke_operation(
		contract_address(1),
		"transfer",
		vec![ScVal::I64(100)],
		vec![auth_entry(
			false,
			invocation(contract_address(2), "transfer", vec![ScVal::I64(100)], vec![]),
		)],
	)];
	tx.operation_results = vec![invoke_op_result()];
	tx.events = Some(TransactionEvents {
		operation_events: vec![vec![StellarContractEventBuilder::new()
			.contract(1)
			.symbol_topic("transfer")
			.data(ScVal::I64(100))
			.build()]],
		transaction_events: vec![],
	});
	tx
}

#[tokio::test]
async fn test_single_invocation_with_one_call_edge() {
	let (extractor, mut receiver, _shutdown) = extractor();
	let mut tx = transfer_transaction(0, "aa");
	tx.events = None;

	let summary = extractor
		.process_ledger(&ledger_with(100, vec![tx]))
		.await
		.unwrap();
	assert_eq!(summary.invocations_emitted, 1);
	assert_eq!(summary.events_emitted, 0);

	let records = drain(&mut receiver);
	assert_eq!(records.len(), 1);
	let ExtractedRecord::ContractInvocation(invocation) = &records[0] else {
		panic!("expected an invocation, got {:?}", records[0]);
	};

	let c = encode_contract_id(&contract_hash(1));
	let t = encode_contract_id(&contract_hash(2));
	assert_eq!(invocation.contract_id, c);
	assert_eq!(invocation.function_name, "transfer");
	assert!(invocation.successful);
	assert!(invocation.meta.in_successful_tx);
	assert_eq!(invocation.meta.ledger_sequence, 100);
	assert_eq!(invocation.contract_calls.len(), 1);

	let call = &invocation.contract_calls[0];
	assert_eq!(call.from_contract, c);
	assert_eq!(call.to_contract, t);
	assert_eq!(call.function, "transfer");
	assert_eq!(call.call_depth, 0);
	assert_eq!(call.execution_order, 0);
	assert_eq!(call.auth_type, StellarAuthType::SourceAccount);
}

#[tokio::test]
async fn test_classic_transactions_produce_no_records() {
	let (extractor, mut receiver, _shutdown) = extractor();
	let ledger = ledger_with(
		7,
		vec![
			LedgerTransaction::new(0, "p0", true),
			LedgerTransaction::new(1, "p1", false),
		],
	);

	let summary = extractor.process_ledger(&ledger).await.unwrap();
	assert_eq!(summary.events_emitted + summary.invocations_emitted, 0);
	assert!(drain(&mut receiver).is_empty());
}

#[tokio::test]
async fn test_read_failure_keeps_earlier_records() {
	let (extractor, mut receiver, _shutdown) = extractor();
	let transactions = vec![transfer_transaction(0, "aa"), transfer_transaction(1, "bb")];
	let ledger = ledger_with_passes(
		12,
		vec![
			(transactions.clone(), None),
			// Second pass breaks after the first transaction
			(transactions, Some(1)),
		],
	);

	let result = extractor.process_ledger(&ledger).await;
	assert!(matches!(result, Err(ExtractorError::ReadError(_))));

	let records = drain(&mut receiver);
	assert_eq!(records.len(), 2);
	assert!(records.iter().all(|r| r.meta().tx_hash == "aa"));
	assert_eq!(records[0].record_type(), "contract_event");
	assert_eq!(records[1].record_type(), "contract_invocation");
}

#[tokio::test]
async fn test_first_pass_failure_emits_nothing() {
	let (extractor, mut receiver, _shutdown) = extractor();
	let ledger = ledger_with_passes(12, vec![(vec![transfer_transaction(0, "aa")], Some(0))]);

	let result = extractor.process_ledger(&ledger).await;
	assert!(matches!(result, Err(ExtractorError::ReadError(_))));
	assert!(drain(&mut receiver).is_empty());
}

#[tokio::test]
async fn test_shutdown_before_processing_cancels() {
	let (extractor, mut receiver, shutdown) = extractor();
	shutdown.send(true).unwrap();

	let result = extractor
		.process_ledger(&ledger_with(3, vec![transfer_transaction(0, "aa")]))
		.await;
	assert!(matches!(result, Err(ExtractorError::Cancelled(_))));
	assert!(drain(&mut receiver).is_empty());
}

#[tokio::test]
async fn test_shutdown_while_blocked_on_full_channel() {
	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let config = ExtractorConfig {
		channel_capacity: 1,
		..ExtractorConfig::new(TESTNET_NETWORK_PASSPHRASE)
	};
	let (extractor, mut receiver) = LedgerEventExtractor::new(config, shutdown_rx);

	let ledger = ledger_with(
		3,
		vec![transfer_transaction(0, "aa"), transfer_transaction(1, "bb")],
	);
	let pass = tokio::spawn(async move { extractor.process_ledger(&ledger).await });

	// Wait for the first record, then leave the channel full and signal shutdown
	let first = receiver.recv().await.unwrap();
	assert_eq!(first.meta().tx_hash, "aa");
	tokio::task::yield_now().await;
	shutdown_tx.send(true).unwrap();

	let result = pass.await.unwrap();
	assert!(matches!(result, Err(ExtractorError::Cancelled(_))));
}

#[tokio::test]
async fn test_dropped_receiver_is_channel_closed() {
	let (extractor, receiver, _shutdown) = extractor();
	drop(receiver);

	let result = extractor
		.process_ledger(&ledger_with(3, vec![transfer_transaction(0, "aa")]))
		.await;
	assert!(matches!(result, Err(ExtractorError::ChannelClosed(_))));
}

#[tokio::test]
async fn test_failed_transaction_still_reports_events() {
	let (extractor, mut receiver, _shutdown) = extractor();
	let mut tx = transfer_transaction(0, "aa");
	tx.successful = false;
	tx.operation_results = vec![];

	extractor
		.process_ledger(&ledger_with(5, vec![tx]))
		.await
		.unwrap();

	let records = drain(&mut receiver);
	assert_eq!(records.len(), 2);
	assert!(records.iter().all(|r| !r.meta().in_successful_tx));
	match &records[1] {
		ExtractedRecord::ContractInvocation(invocation) => assert!(!invocation.successful),
		other => panic!("expected an invocation, got {:?}", other),
	}
}

#[tokio::test]
async fn test_event_topics_and_type_detection() {
	let (extractor, mut receiver, _shutdown) = extractor();
	let mut tx = LedgerTransaction::new(0, "aa", true);
	tx.events = Some(TransactionEvents {
		operation_events: vec![
			vec![],
			vec![
				StellarContractEventBuilder::new()
					.contract(4)
					.topic(ScVal::U32(1))
					.symbol_topic("Mint")
					.build(),
				StellarContractEventBuilder::new()
					.contract(4)
					.topic(symbol("LiquidityAdded"))
					.build(),
			],
		],
		transaction_events: vec![],
	});

	extractor
		.process_ledger(&ledger_with(5, vec![tx]))
		.await
		.unwrap();

	let events: Vec<_> = drain(&mut receiver)
		.into_iter()
		.map(|record| match record {
			ExtractedRecord::ContractEvent(event) => *event,
			other => panic!("expected an event, got {:?}", other),
		})
		.collect();
	assert_eq!(events.len(), 2);
	assert_eq!(events[0].detected_event_type, "mint");
	assert_eq!(events[1].detected_event_type, "LiquidityAdded");
	assert!(events.iter().all(|e| e.meta.operation_index == 1));
	assert_eq!(
		events.iter().map(|e| e.meta.event_index).collect::<Vec<_>>(),
		vec![0, 1]
	);
}
