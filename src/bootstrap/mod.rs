//! Bootstrap module for wiring the extractor into a process.
//!
//! - `load_config`: Resolves the extractor configuration from a file, the environment and
//!   command line overrides
//! - `load_ledgers`: Reads RPC shaped ledgers from a JSON file
//! - `write_records`: Drains the record channel as JSON lines
//! - `run_extraction`: Feeds ledgers through the extractor in order

use std::{error::Error, path::Path};
use tokio::{
	io::{AsyncWrite, AsyncWriteExt},
	sync::mpsc,
};
use tracing::{error, info};

use crate::{
	models::{
		ConfigLoader, ExtractedRecord, ExtractorConfig, LedgerSummary, StellarLedger,
		StellarLedgerInfo,
	},
	services::extractor::{ExtractorError, LedgerEventExtractor, LedgerSource},
};

/// Type alias for results returned to the binary
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Resolves the extractor configuration.
///
/// Precedence, lowest first: built-in defaults or the config file, environment variables,
/// then `network_passphrase`. The built-in defaults carry no passphrase, so one of the other
/// sources has to supply it.
///
/// # Errors
/// Returns a `ConfigError` if the file cannot be loaded or the final configuration is invalid
pub async fn load_config(
	path: Option<&Path>,
	network_passphrase: Option<String>,
) -> std::result::Result<ExtractorConfig, crate::models::ConfigError> {
	let mut config = match path {
		Some(path) => ExtractorConfig::load_from_path(path).await?,
		None => ExtractorConfig::default().with_overrides(|key| std::env::var(key).ok()),
	};

	if let Some(passphrase) = network_passphrase {
		config.network_passphrase = passphrase;
	}

	config.validate()?;
	Ok(config)
}

/// Reads a JSON array of ledgers in the RPC response shape.
///
/// # Errors
/// `ReadError` if the file cannot be read or is not a JSON array of ledgers
pub async fn load_ledgers(path: &Path) -> std::result::Result<Vec<StellarLedger>, ExtractorError> {
	let metadata = || {
		Some(std::collections::HashMap::from([(
			"path".to_string(),
			path.display().to_string(),
		)]))
	};

	let content = tokio::fs::read_to_string(path).await.map_err(|e| {
		ExtractorError::read_error("Failed to read ledgers file", Some(Box::new(e)), metadata())
	})?;
	let ledgers: Vec<StellarLedgerInfo> = serde_json::from_str(&content).map_err(|e| {
		ExtractorError::read_error("Failed to parse ledgers file", Some(Box::new(e)), metadata())
	})?;

	Ok(ledgers.into_iter().map(StellarLedger::from).collect())
}

/// Writes every record from `receiver` to `writer` as one JSON object per line.
///
/// Returns once the channel is closed, with the number of records written.
pub async fn write_records<W: AsyncWrite + Unpin>(
	receiver: &mut mpsc::Receiver<ExtractedRecord>,
	writer: &mut W,
) -> std::io::Result<usize> {
	let mut written = 0;
	while let Some(record) = receiver.recv().await {
		let mut line = serde_json::to_vec(&record)?;
		line.push(b'\n');
		writer.write_all(&line).await?;
		written += 1;
	}
	writer.flush().await?;
	Ok(written)
}

/// Processes `ledgers` in order.
///
/// A ledger whose transactions cannot be read is reported and skipped. Cancellation and a
/// closed channel stop the run.
///
/// # Returns
/// The summaries of the ledgers that completed
pub async fn run_extraction<L: LedgerSource>(
	extractor: &LedgerEventExtractor,
	ledgers: &[L],
) -> std::result::Result<Vec<LedgerSummary>, ExtractorError> {
	let mut summaries = Vec::with_capacity(ledgers.len());

	for ledger in ledgers {
		match extractor.process_ledger(ledger).await {
			Ok(summary) => summaries.push(summary),
			Err(e @ ExtractorError::ReadError(_)) => {
				error!(ledger = ledger.sequence(), error = %e, "Skipping unreadable ledger");
			}
			Err(e) => return Err(e),
		}
	}

	info!(
		processed = summaries.len(),
		total = ledgers.len(),
		"Extraction finished"
	);
	Ok(summaries)
}
