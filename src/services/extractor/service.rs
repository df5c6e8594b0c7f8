//! Ledger extraction service.
//!
//! [`LedgerEventExtractor`] walks one ledger at a time and streams contract event and
//! contract invocation records to a bounded channel. Records are emitted as soon as they
//! are built, so a ledger that fails half way leaves its earlier records delivered.

use std::collections::HashMap;
use stellar_xdr::curr::{ContractEventType, OperationBody};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

use crate::{
	models::{ExtractedRecord, ExtractorConfig, LedgerSummary, StellarDiagnosticEvent},
	services::extractor::{
		emitter::RecordEmitter,
		error::ExtractorError,
		records::{
			build_contract_event, build_contract_invocation, build_diagnostic_events,
			TransactionContext, TRANSACTION_LEVEL_OPERATION_INDEX,
		},
		source::LedgerSource,
	},
	utils::metrics::{LEDGERS_FAILED, LEDGERS_PROCESSED, RECORDS_EMITTED, RECORDS_SKIPPED},
};

/// Extracts contract records from ledgers
///
/// Processing takes `&self`, so one extractor can serve concurrent ledger passes; each pass
/// sends through its own clone of the channel sender. Dropping the extractor (and every
/// in-flight pass) closes the channel.
pub struct LedgerEventExtractor {
	config: ExtractorConfig,
	emitter: RecordEmitter<ExtractedRecord>,
}

impl LedgerEventExtractor {
	/// Creates an extractor and the receiver its records are delivered to.
	///
	/// # Arguments
	/// * `config` - Extraction settings
	/// * `shutdown` - Shutdown signal, observed at every emission
	///
	/// # Returns
	/// The extractor and the receiving half of a channel of `config.channel_capacity`
	pub fn new(
		config: ExtractorConfig,
		shutdown: watch::Receiver<bool>,
	) -> (Self, mpsc::Receiver<ExtractedRecord>) {
		let (emitter, receiver) = RecordEmitter::new(config.channel_capacity, shutdown);
		(Self { config, emitter }, receiver)
	}

	pub fn config(&self) -> &ExtractorConfig {
		&self.config
	}

	/// Processes one ledger.
	///
	/// A first pass over the transactions records which succeeded; the second pass builds
	/// and emits records in ledger order. For each transaction, contract events come first
	/// (operation-level, then transaction-level), followed by one invocation per
	/// `InvokeHostFunction` operation.
	///
	/// # Errors
	/// * `ReadError` if the transaction stream fails
	/// * `Cancelled` if shutdown is signalled before all records are emitted
	/// * `ChannelClosed` if the receiver is gone
	///
	/// Records that cannot be encoded are skipped and counted in the summary.
	#[instrument(skip_all, fields(ledger = ledger.sequence()))]
	pub async fn process_ledger<L: LedgerSource + ?Sized>(
		&self,
		ledger: &L,
	) -> Result<LedgerSummary, ExtractorError> {
		let result = self.extract_ledger(ledger).await;

		match &result {
			Ok(summary) => {
				LEDGERS_PROCESSED.inc();
				info!(
					events = summary.events_emitted,
					invocations = summary.invocations_emitted,
					skipped = summary.records_skipped,
					"Ledger processed"
				);
			}
			Err(ExtractorError::Cancelled(_)) => {
				LEDGERS_FAILED.with_label_values(&["cancelled"]).inc();
				info!("Ledger extraction cancelled");
			}
			Err(ExtractorError::ReadError(_)) => {
				LEDGERS_FAILED.with_label_values(&["read"]).inc();
			}
			Err(ExtractorError::ChannelClosed(_)) => {
				LEDGERS_FAILED.with_label_values(&["channel_closed"]).inc();
			}
			Err(e) => {
				LEDGERS_FAILED.with_label_values(&["other"]).inc();
				warn!(error = %e, "Ledger extraction failed");
			}
		}

		result
	}

	async fn extract_ledger<L: LedgerSource + ?Sized>(
		&self,
		ledger: &L,
	) -> Result<LedgerSummary, ExtractorError> {
		let mut emitter = self.emitter.clone();
		let mut summary = LedgerSummary {
			ledger_sequence: ledger.sequence(),
			..LedgerSummary::default()
		};
		let closed_at = ledger.closed_at()?;

		let statuses = transaction_statuses(ledger).await?;

		let mut reader = ledger.transaction_reader()?;
		while let Some(transaction) = reader.read().await? {
			let ctx = TransactionContext {
				ledger_sequence: summary.ledger_sequence,
				closed_at,
				network_passphrase: &self.config.network_passphrase,
				transaction: &transaction,
				in_successful_tx: statuses
					.get(&transaction.hash)
					.copied()
					.unwrap_or(transaction.successful),
			};

			let diagnostics = if self.config.include_diagnostic_events {
				build_diagnostic_events(&transaction.diagnostic_events)
			} else {
				Vec::new()
			};

			if self.config.extract_events {
				self.emit_events(&ctx, &diagnostics, &mut emitter, &mut summary)
					.await?;
			}
			if self.config.extract_invocations {
				self.emit_invocations(&ctx, &diagnostics, &mut emitter, &mut summary)
					.await?;
			}
		}

		Ok(summary)
	}

	async fn emit_events(
		&self,
		ctx: &TransactionContext<'_>,
		diagnostics: &[StellarDiagnosticEvent],
		emitter: &mut RecordEmitter<ExtractedRecord>,
		summary: &mut LedgerSummary,
	) -> Result<(), ExtractorError> {
		let Some(events) = &ctx.transaction.events else {
			return Ok(());
		};

		let lists = events
			.operation_events
			.iter()
			.enumerate()
			.map(|(index, list)| (i32::try_from(index).unwrap_or(i32::MAX), list.as_slice()))
			.chain(std::iter::once((
				TRANSACTION_LEVEL_OPERATION_INDEX,
				events.transaction_events.as_slice(),
			)));

		for (operation_index, list) in lists {
			for (event_index, event) in list.iter().enumerate() {
				if event.type_ != ContractEventType::Contract {
					continue;
				}
				let event_index = u32::try_from(event_index).unwrap_or(u32::MAX);
				match build_contract_event(
					ctx,
					event,
					operation_index,
					event_index,
					diagnostics.to_vec(),
				) {
					Ok(record) => {
						emit(emitter, ExtractedRecord::ContractEvent(Box::new(record))).await?;
						summary.events_emitted += 1;
					}
					Err(e) => skip_record(e, summary)?,
				}
			}
		}

		Ok(())
	}

	async fn emit_invocations(
		&self,
		ctx: &TransactionContext<'_>,
		diagnostics: &[StellarDiagnosticEvent],
		emitter: &mut RecordEmitter<ExtractedRecord>,
		summary: &mut LedgerSummary,
	) -> Result<(), ExtractorError> {
		for (operation_index, operation) in ctx.transaction.operations.iter().enumerate() {
			let OperationBody::InvokeHostFunction(invoke) = &operation.body else {
				continue;
			};
			match build_contract_invocation(
				ctx,
				operation_index,
				operation,
				invoke,
				diagnostics.to_vec(),
			) {
				Ok(record) => {
					emit(
						emitter,
						ExtractedRecord::ContractInvocation(Box::new(record)),
					)
					.await?;
					summary.invocations_emitted += 1;
				}
				Err(e) => skip_record(e, summary)?,
			}
		}

		Ok(())
	}
}

/// First pass: the success flag of every transaction in the ledger, by hash
async fn transaction_statuses<L: LedgerSource + ?Sized>(
	ledger: &L,
) -> Result<HashMap<String, bool>, ExtractorError> {
	let mut reader = ledger.transaction_reader()?;
	let mut statuses = HashMap::new();
	while let Some(transaction) = reader.read().await? {
		statuses.insert(transaction.hash, transaction.successful);
	}
	Ok(statuses)
}

async fn emit(
	emitter: &mut RecordEmitter<ExtractedRecord>,
	record: ExtractedRecord,
) -> Result<(), ExtractorError> {
	let record_type = record.record_type();
	emitter.emit(record).await?;
	RECORDS_EMITTED.with_label_values(&[record_type]).inc();
	Ok(())
}

/// Logs and counts a record that could not be built. Non-recoverable errors propagate.
fn skip_record(error: ExtractorError, summary: &mut LedgerSummary) -> Result<(), ExtractorError> {
	if !error.is_recoverable() {
		return Err(error);
	}
	debug!(error = %error, "Skipping record");
	RECORDS_SKIPPED.with_label_values(&["encoding"]).inc();
	summary.records_skipped += 1;
	Ok(())
}
