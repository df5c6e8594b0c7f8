//! Decoded representation of Soroban contract values.
//!
//! `DecodedValue` is the JSON-representable mirror of the XDR `ScVal` union. It has two
//! renderings:
//!
//! - the derived `Serialize` form, which keeps the variant tag next to the value
//!   (`{"type": "u128", "value": "0x..."}`) so downstream consumers never lose type fidelity
//! - [`DecodedValue::to_json`] / `Display`, a plain JSON form used wherever a value has to be
//!   stringified (state change keys and values)

use chrono::{DateTime, SecondsFormat};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::fmt;

/// Distinguishes the two kinds of Soroban addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
	/// Ed25519 account (`G...` strkey)
	Account,
	/// Contract (`C...` strkey)
	Contract,
}

/// An address rendered as a checksummed strkey string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedAddress {
	pub kind: AddressKind,
	pub address: String,
}

/// A single map entry. Entries keep the order in which they appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedMapEntry {
	pub key: DecodedValue,
	pub value: DecodedValue,
}

/// A contract instance stored in ledger (the value behind the instance ledger key)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedContractInstance {
	/// Hex encoded WASM hash, `None` for the built-in Stellar Asset Contract
	pub wasm_hash: Option<String>,
	/// Instance storage, in wire order
	pub storage: Vec<DecodedMapEntry>,
}

/// Represents every contract value the extractor knows how to decode
///
/// 128 and 256-bit integers are carried as fixed-width `0x` prefixed hex strings (limbs
/// concatenated high-to-low) so that no JSON consumer ever rounds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DecodedValue {
	Bool(bool),
	/// Void, also the fallback for anything that could not be decoded
	Void,
	U32(u32),
	I32(i32),
	U64(u64),
	I64(i64),
	U128(String),
	I128(String),
	U256(String),
	I256(String),
	Bytes(#[serde(serialize_with = "serialize_hex")] Vec<u8>),
	String(String),
	Symbol(String),
	Vec(Vec<DecodedValue>),
	Map(Vec<DecodedMapEntry>),
	Address(DecodedAddress),
	LedgerKeyContractInstance,
	LedgerKeyNonce(i64),
	ContractInstance(DecodedContractInstance),
	/// Absolute time in unix seconds
	Timepoint(#[serde(serialize_with = "serialize_timepoint")] u64),
	/// Relative time in seconds
	Duration(u64),
}

impl DecodedValue {
	/// Returns the symbol text if this value is a symbol.
	pub fn as_symbol(&self) -> Option<&str> {
		match self {
			DecodedValue::Symbol(s) => Some(s),
			_ => None,
		}
	}

	/// Returns true for the void sentinel.
	pub fn is_void(&self) -> bool {
		matches!(self, DecodedValue::Void)
	}

	/// Converts this value to plain JSON without type tags.
	///
	/// Maps become arrays of `{"key": .., "value": ..}` objects because a JSON object would
	/// neither preserve wire order nor allow non-string keys.
	pub fn to_json(&self) -> Value {
		match self {
			DecodedValue::Bool(b) => json!(b),
			DecodedValue::Void => Value::Null,
			DecodedValue::U32(n) => json!(n),
			DecodedValue::I32(n) => json!(n),
			DecodedValue::U64(n) => json!(n),
			DecodedValue::I64(n) => json!(n),
			DecodedValue::U128(s)
			| DecodedValue::I128(s)
			| DecodedValue::U256(s)
			| DecodedValue::I256(s) => json!(s),
			DecodedValue::Bytes(b) => json!(hex::encode(b)),
			DecodedValue::String(s) => json!(s),
			DecodedValue::Symbol(s) => json!(s),
			DecodedValue::Vec(items) => {
				Value::Array(items.iter().map(DecodedValue::to_json).collect())
			}
			DecodedValue::Map(entries) => entries_to_json(entries),
			DecodedValue::Address(addr) => json!(addr.address),
			DecodedValue::LedgerKeyContractInstance => json!("contract_instance"),
			DecodedValue::LedgerKeyNonce(nonce) => json!({ "nonce": nonce }),
			DecodedValue::ContractInstance(instance) => json!({
				"wasm_hash": instance.wasm_hash,
				"storage": entries_to_json(&instance.storage),
			}),
			DecodedValue::Timepoint(t) => match format_timepoint(*t) {
				Some(formatted) => json!(formatted),
				None => json!(t),
			},
			DecodedValue::Duration(d) => json!(d),
		}
	}
}

impl fmt::Display for DecodedValue {
	/// Formats the value as compact plain JSON.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_json())
	}
}

fn entries_to_json(entries: &[DecodedMapEntry]) -> Value {
	Value::Array(
		entries
			.iter()
			.map(|entry| json!({ "key": entry.key.to_json(), "value": entry.value.to_json() }))
			.collect(),
	)
}

/// Renders unix seconds as an RFC 3339 UTC timestamp, if representable.
pub fn format_timepoint(seconds: u64) -> Option<String> {
	let seconds = i64::try_from(seconds).ok()?;
	DateTime::from_timestamp(seconds, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_str(&hex::encode(bytes))
}

fn serialize_timepoint<S: Serializer>(seconds: &u64, serializer: S) -> Result<S::Ok, S::Error> {
	match format_timepoint(*seconds) {
		Some(formatted) => serializer.serialize_str(&formatted),
		None => serializer.serialize_u64(*seconds),
	}
}
