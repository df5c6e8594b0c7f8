//! Configuration loading and validation.
//!
//! This module provides the loader trait and the extractor's configuration file format.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use std::path::Path;

mod error;
mod extractor_config;

pub use error::ConfigError;
pub use extractor_config::{
	ExtractorConfig, DEFAULT_CHANNEL_CAPACITY, NETWORK_PASSPHRASE_ENV, PUBLIC_NETWORK_PASSPHRASE,
	TESTNET_NETWORK_PASSPHRASE,
};

/// Common interface for loading configuration files
#[async_trait]
pub trait ConfigLoader: Sized {
	/// Load configuration from a specific file path
	async fn load_from_path(path: &Path) -> Result<Self, error::ConfigError>;

	/// Validate the configuration
	///
	/// Returns Ok(()) if valid, or an error message if invalid.
	fn validate(&self) -> Result<(), error::ConfigError>;

	/// Check if a file is a JSON file based on extension
	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
