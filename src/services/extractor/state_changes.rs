//! Contract data state change extraction.

use stellar_xdr::curr::{ContractDataEntry, LedgerEntry, LedgerEntryData};

use crate::{
	models::{EntryChange, EntryChangeKind, StellarStateChange, StellarStateChangeOperation},
	services::extractor::decoder::{contract_id_from_address, decode_sc_val},
};

fn contract_data(entry: Option<&LedgerEntry>) -> Option<&ContractDataEntry> {
	match entry.map(|e| &e.data) {
		Some(LedgerEntryData::ContractData(data)) => Some(data),
		_ => None,
	}
}

/// Turns paired ledger entry changes into contract data state changes.
///
/// Only contract data entries are considered. Keys and values are decoded and stringified
/// as compact JSON. A change is skipped when the snapshot its kind requires is missing or
/// when its contract address is not a contract.
///
/// # Arguments
/// * `changes` - Paired changes in meta order
///
/// # Returns
/// State changes in input order
pub fn extract_state_changes(changes: &[EntryChange]) -> Vec<StellarStateChange> {
	changes.iter().filter_map(state_change).collect()
}

fn state_change(change: &EntryChange) -> Option<StellarStateChange> {
	let pre = contract_data(change.pre.as_ref());
	let post = contract_data(change.post.as_ref());

	let (identity, old_value, new_value, operation) = match change.kind {
		EntryChangeKind::Created => {
			let post = post?;
			(post, None, Some(post), StellarStateChangeOperation::Create)
		}
		EntryChangeKind::Updated => {
			let (pre, post) = (pre?, post?);
			(post, Some(pre), Some(post), StellarStateChangeOperation::Update)
		}
		EntryChangeKind::Removed => {
			let pre = pre?;
			(pre, Some(pre), None, StellarStateChangeOperation::Delete)
		}
	};

	let Some(contract_id) = contract_id_from_address(&identity.contract) else {
		tracing::debug!("Skipping state change of a non-contract address");
		return None;
	};

	Some(StellarStateChange {
		contract_id,
		key: decode_sc_val(&identity.key).to_string(),
		old_value: old_value.map(|data| decode_sc_val(&data.val).to_string()),
		new_value: new_value.map(|data| decode_sc_val(&data.val).to_string()),
		operation,
	})
}
