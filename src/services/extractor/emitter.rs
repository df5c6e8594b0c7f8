//! Bounded, cancellable record emission.
//!
//! The emitter owns the sending half of a bounded channel. A full channel applies
//! backpressure: `emit` waits until the consumer makes room or shutdown is signalled,
//! whichever comes first.

use tokio::sync::{mpsc, watch};

use crate::services::extractor::error::ExtractorError;

/// Sends records to the consumer, observing the shutdown signal at every emission
pub struct RecordEmitter<T> {
	sender: mpsc::Sender<T>,
	shutdown: watch::Receiver<bool>,
}

impl<T> Clone for RecordEmitter<T> {
	fn clone(&self) -> Self {
		Self {
			sender: self.sender.clone(),
			shutdown: self.shutdown.clone(),
		}
	}
}

impl<T: Send> RecordEmitter<T> {
	/// Creates an emitter and the matching receiver.
	///
	/// # Arguments
	/// * `capacity` - Channel capacity, at least 1
	/// * `shutdown` - Shutdown signal, `true` means stop emitting
	pub fn new(capacity: usize, shutdown: watch::Receiver<bool>) -> (Self, mpsc::Receiver<T>) {
		let (sender, receiver) = mpsc::channel(capacity.max(1));
		(Self { sender, shutdown }, receiver)
	}

	/// Returns true once shutdown has been signalled.
	pub fn is_cancelled(&self) -> bool {
		*self.shutdown.borrow()
	}

	/// Emits one record, waiting for channel capacity.
	///
	/// # Errors
	/// * `Cancelled` if shutdown is signalled before the record is accepted
	/// * `ChannelClosed` if the receiver has been dropped
	pub async fn emit(&mut self, record: T) -> Result<(), ExtractorError> {
		if self.is_cancelled() {
			return Err(ExtractorError::cancelled(
				"Shutdown signalled before emission",
				None,
				None,
			));
		}

		tokio::select! {
			biased;
			_ = wait_for_shutdown(&mut self.shutdown) => Err(ExtractorError::cancelled(
				"Shutdown signalled while waiting for channel capacity",
				None,
				None,
			)),
			sent = self.sender.send(record) => sent.map_err(|_| {
				ExtractorError::channel_closed("Record receiver dropped", None, None)
			}),
		}
	}
}

/// Resolves once shutdown is signalled. Never resolves if the signal's sender is gone.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
	if shutdown.wait_for(|stop| *stop).await.is_err() {
		std::future::pending::<()>().await;
	}
}
