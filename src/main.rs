//! Stellar contract record extractor entry point.
//!
//! Reads ledgers in the Stellar RPC `getTransactions` shape from a JSON file, extracts
//! contract events and contract invocations, and writes them to stdout as JSON lines.
//! Logs go to stderr or to a rolling log file. Ctrl+C stops extraction at the next record.

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;

use crate::{
	bootstrap::{load_config, load_ledgers, run_extraction, write_records, Result},
	services::extractor::LedgerEventExtractor,
	utils::{logging::setup_logging, metrics::gather_metrics, parse_string_to_bytes_size},
};

use clap::Parser;
use dotenvy::dotenv_override;
use std::{
	env::{set_var, var},
	path::PathBuf,
};
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Parser)]
#[command(
	name = "stellar-contract-extractor",
	about = "Extracts contract events and contract invocations from Stellar ledgers.",
	version
)]
struct Cli {
	/// JSON file holding an array of ledgers in the RPC response shape
	#[arg(long, value_name = "PATH")]
	ledgers: PathBuf,

	/// Extractor configuration file (JSON)
	#[arg(long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Network passphrase, overriding the config file and NETWORK_PASSPHRASE
	#[arg(long, value_name = "PASSPHRASE")]
	network_passphrase: Option<String>,

	/// Write logs to file instead of stderr
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,

	/// Print Prometheus metrics to stderr on exit
	#[arg(long)]
	metrics: bool,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		dotenv_override().ok();

		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();
	cli.apply_to_env();

	if let Err(e) = setup_logging() {
		eprintln!("Failed to setup logging: {}", e);
	}

	let config = load_config(cli.config.as_deref(), cli.network_passphrase.clone()).await?;
	let ledgers = load_ledgers(&cli.ledgers).await?;
	info!(
		ledgers = ledgers.len(),
		network = %config.network_passphrase,
		"Starting extraction"
	);

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let (extractor, mut receiver) = LedgerEventExtractor::new(config, shutdown_rx);

	let writer = tokio::spawn(async move {
		let mut stdout = tokio::io::stdout();
		write_records(&mut receiver, &mut stdout).await
	});

	let interrupt = tokio::spawn(async move {
		match tokio::signal::ctrl_c().await {
			Ok(()) => {
				info!("Shutdown signal received, stopping extraction...");
				let _ = shutdown_tx.send(true);
			}
			Err(e) => error!("Error waiting for Ctrl+C: {}", e),
		}
	});

	let result = run_extraction(&extractor, &ledgers).await;

	// Closes the channel so the writer can finish
	drop(extractor);
	interrupt.abort();

	match writer.await {
		Ok(Ok(written)) => info!(records = written, "Records written"),
		Ok(Err(e)) => error!("Failed to write records: {}", e),
		Err(e) => error!("Record writer task failed: {}", e),
	}

	if cli.metrics {
		match gather_metrics() {
			Ok(metrics) => eprintln!("{}", String::from_utf8_lossy(&metrics)),
			Err(e) => error!("Failed to gather metrics: {}", e),
		}
	}

	let summaries = result?;
	info!(ledgers = summaries.len(), "Extraction complete");
	Ok(())
}
