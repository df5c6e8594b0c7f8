//! Extractor configuration loading and validation.
//!
//! The configuration is a single JSON file. Every field except the network passphrase has
//! a default, and the `NETWORK_PASSPHRASE` environment variable overrides the file.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};

use crate::models::{config::error::ConfigError, ConfigLoader};

/// Passphrase of the Stellar public network
pub const PUBLIC_NETWORK_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Passphrase of the Stellar test network
pub const TESTNET_NETWORK_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Default capacity of the record channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Environment variable that overrides `network_passphrase`
pub const NETWORK_PASSPHRASE_ENV: &str = "NETWORK_PASSPHRASE";

fn default_channel_capacity() -> usize {
	DEFAULT_CHANNEL_CAPACITY
}

fn default_true() -> bool {
	true
}

/// Settings of a [`LedgerEventExtractor`](crate::services::extractor::LedgerEventExtractor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractorConfig {
	/// Network passphrase copied into every record
	pub network_passphrase: String,

	/// Capacity of the bounded record channel
	#[serde(default = "default_channel_capacity")]
	pub channel_capacity: usize,

	/// Emit contract event records
	#[serde(default = "default_true")]
	pub extract_events: bool,

	/// Emit contract invocation records
	#[serde(default = "default_true")]
	pub extract_invocations: bool,

	/// Nest diagnostic events under emitted records
	#[serde(default = "default_true")]
	pub include_diagnostic_events: bool,
}

impl ExtractorConfig {
	/// Creates a configuration with default settings for the given network.
	pub fn new(network_passphrase: impl Into<String>) -> Self {
		Self {
			network_passphrase: network_passphrase.into(),
			channel_capacity: DEFAULT_CHANNEL_CAPACITY,
			extract_events: true,
			extract_invocations: true,
			include_diagnostic_events: true,
		}
	}

	/// Applies overrides from a variable lookup (normally the process environment).
	///
	/// Empty values are ignored.
	pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
		if let Some(passphrase) = lookup(NETWORK_PASSPHRASE_ENV).filter(|v| !v.trim().is_empty())
		{
			self.network_passphrase = passphrase;
		}
		self
	}
}

/// Default settings without a network passphrase, which must be supplied before validation
impl Default for ExtractorConfig {
	fn default() -> Self {
		Self::new("")
	}
}

#[async_trait]
impl ConfigLoader for ExtractorConfig {
	/// Load the extractor configuration from a JSON file
	///
	/// Environment overrides are applied before validation.
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let metadata = || {
			Some(HashMap::from([(
				"path".to_string(),
				path.display().to_string(),
			)]))
		};

		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(
				"extractor config must be a .json file",
				None,
				metadata(),
			));
		}

		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open extractor config file: {}", e),
				Some(Box::new(e)),
				metadata(),
			)
		})?;
		let config: ExtractorConfig = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse extractor config: {}", e),
				Some(Box::new(e)),
				metadata(),
			)
		})?;

		let config = config.with_overrides(|key| std::env::var(key).ok());
		config.validate()?;

		Ok(config)
	}

	/// Validate the extractor configuration
	///
	/// Ensures that:
	/// - The network passphrase is not empty
	/// - The channel can hold at least one record
	fn validate(&self) -> Result<(), ConfigError> {
		if self.network_passphrase.trim().is_empty() {
			return Err(ConfigError::validation_error(
				format!(
					"network_passphrase is required, set it in the config file or through {}",
					NETWORK_PASSPHRASE_ENV
				),
				None,
				None,
			));
		}

		if self.channel_capacity == 0 {
			return Err(ConfigError::validation_error(
				"channel_capacity must be greater than zero",
				None,
				None,
			));
		}

		if !self.extract_events && !self.extract_invocations {
			tracing::warn!("Both event and invocation extraction are disabled");
		}

		Ok(())
	}
}
