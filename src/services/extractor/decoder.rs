//! Contract value decoding.
//!
//! Turns XDR `ScVal` trees into [`DecodedValue`] trees and renders the address types the
//! extractor reports (contracts, accounts, muxed accounts) as strkey strings. Decoding never
//! fails: anything that cannot be represented becomes void.

use stellar_strkey::{ed25519::PublicKey as StrkeyPublicKey, Contract};
use stellar_xdr::curr::{
	AccountId, ContractExecutable, Hash, Int128Parts, Int256Parts, Limits, MuxedAccount,
	PublicKey, ReadXdr, ScAddress, ScContractInstance, ScMap, ScVal, UInt128Parts, UInt256Parts,
};

use crate::models::{
	AddressKind, DecodedAddress, DecodedContractInstance, DecodedMapEntry, DecodedValue,
};

/// Decodes a contract value into its JSON-representable form.
///
/// Vectors and maps are decoded recursively and keep their wire order. A nil vector or map
/// decodes to an empty sequence.
///
/// # Arguments
/// * `val` - The value to decode
///
/// # Returns
/// The decoded value, or `DecodedValue::Void` for anything unsupported
pub fn decode_sc_val(val: &ScVal) -> DecodedValue {
	match val {
		ScVal::Bool(b) => DecodedValue::Bool(*b),
		ScVal::Void => DecodedValue::Void,
		ScVal::U32(n) => DecodedValue::U32(*n),
		ScVal::I32(n) => DecodedValue::I32(*n),
		ScVal::U64(n) => DecodedValue::U64(*n),
		ScVal::I64(n) => DecodedValue::I64(*n),
		ScVal::Timepoint(t) => DecodedValue::Timepoint(t.0),
		ScVal::Duration(d) => DecodedValue::Duration(d.0),
		ScVal::U128(n) => DecodedValue::U128(combine_u128(n)),
		ScVal::I128(n) => DecodedValue::I128(combine_i128(n)),
		ScVal::U256(n) => DecodedValue::U256(combine_u256(n)),
		ScVal::I256(n) => DecodedValue::I256(combine_i256(n)),
		ScVal::Bytes(b) => DecodedValue::Bytes(b.to_vec()),
		ScVal::String(s) => DecodedValue::String(s.to_string()),
		ScVal::Symbol(s) => DecodedValue::Symbol(s.to_string()),
		ScVal::Vec(vec) => DecodedValue::Vec(
			vec.as_ref()
				.map(|v| decode_sc_vals(&v.0))
				.unwrap_or_default(),
		),
		ScVal::Map(map) => DecodedValue::Map(decode_map_entries(map.as_ref())),
		ScVal::Address(addr) => DecodedValue::Address(encode_sc_address(addr)),
		ScVal::LedgerKeyContractInstance => DecodedValue::LedgerKeyContractInstance,
		ScVal::LedgerKeyNonce(key) => DecodedValue::LedgerKeyNonce(key.nonce),
		ScVal::ContractInstance(instance) => {
			DecodedValue::ContractInstance(decode_contract_instance(instance))
		}
		_ => DecodedValue::Void,
	}
}

/// Decodes an ordered list of values.
pub fn decode_sc_vals(vals: &[ScVal]) -> Vec<DecodedValue> {
	vals.iter().map(decode_sc_val).collect()
}

/// Parses XDR-encoded bytes as a contract value and decodes it.
///
/// # Arguments
/// * `bytes` - The XDR-encoded `ScVal`
///
/// # Returns
/// The decoded value, or `DecodedValue::Void` if the bytes are not a valid `ScVal`
pub fn decode_xdr_value(bytes: &[u8]) -> DecodedValue {
	match ScVal::from_xdr(bytes, Limits::none()) {
		Ok(val) => decode_sc_val(&val),
		Err(e) => {
			tracing::debug!("Failed to parse XDR bytes: {}", e);
			DecodedValue::Void
		}
	}
}

fn decode_map_entries(map: Option<&ScMap>) -> Vec<DecodedMapEntry> {
	map.map(|m| {
		m.0.iter()
			.map(|entry| DecodedMapEntry {
				key: decode_sc_val(&entry.key),
				value: decode_sc_val(&entry.val),
			})
			.collect()
	})
	.unwrap_or_default()
}

fn decode_contract_instance(instance: &ScContractInstance) -> DecodedContractInstance {
	let wasm_hash = match &instance.executable {
		ContractExecutable::Wasm(hash) => Some(hex::encode(hash.0)),
		ContractExecutable::StellarAsset => None,
	};
	DecodedContractInstance {
		wasm_hash,
		storage: decode_map_entries(instance.storage.as_ref()),
	}
}

/// Renders an address as a strkey, tagged with its kind.
pub fn encode_sc_address(addr: &ScAddress) -> DecodedAddress {
	match addr {
		ScAddress::Contract(hash) => DecodedAddress {
			kind: AddressKind::Contract,
			address: encode_contract_id(hash),
		},
		ScAddress::Account(account_id) => DecodedAddress {
			kind: AddressKind::Account,
			address: encode_account_id(account_id),
		},
	}
}

/// Returns the `C...` strkey of an address if it points at a contract.
///
/// Account addresses cannot be used as contract ids and yield `None`.
pub fn contract_id_from_address(addr: &ScAddress) -> Option<String> {
	match addr {
		ScAddress::Contract(hash) => Some(encode_contract_id(hash)),
		ScAddress::Account(_) => None,
	}
}

/// Encodes a contract hash as a `C...` strkey.
pub fn encode_contract_id(hash: &Hash) -> String {
	Contract(hash.0).to_string()
}

/// Encodes an account id as a `G...` strkey.
pub fn encode_account_id(account_id: &AccountId) -> String {
	match account_id {
		AccountId(PublicKey::PublicKeyTypeEd25519(key)) => StrkeyPublicKey(key.0).to_string(),
	}
}

/// Resolves a (possibly muxed) account to its underlying `G...` strkey.
pub fn muxed_account_to_address(account: &MuxedAccount) -> String {
	match account {
		MuxedAccount::Ed25519(key) => StrkeyPublicKey(key.0).to_string(),
		MuxedAccount::MuxedEd25519(muxed) => StrkeyPublicKey(muxed.ed25519.0).to_string(),
	}
}

/// Combines the parts of a UInt128 into a fixed-width hex string.
///
/// # Arguments
/// * `n` - The UInt128Parts containing the 2 64-bit components
///
/// # Returns
/// `0x` followed by 32 hex digits, high limb first
pub fn combine_u128(n: &UInt128Parts) -> String {
	format!("0x{:016x}{:016x}", n.hi, n.lo)
}

/// Combines the parts of an Int128 into a fixed-width hex string.
///
/// The signed high limb is written as its two's complement bit pattern, so `-1` renders as
/// 32 `f` digits.
pub fn combine_i128(n: &Int128Parts) -> String {
	format!("0x{:016x}{:016x}", n.hi as u64, n.lo)
}

/// Combines the parts of a UInt256 into a fixed-width hex string (64 digits).
pub fn combine_u256(n: &UInt256Parts) -> String {
	format!(
		"0x{:016x}{:016x}{:016x}{:016x}",
		n.hi_hi, n.hi_lo, n.lo_hi, n.lo_lo
	)
}

/// Combines the parts of an Int256 into a fixed-width hex string (64 digits).
/// Note: hi_hi is signed (i64) and is written as its two's complement bit pattern.
pub fn combine_i256(n: &Int256Parts) -> String {
	format!(
		"0x{:016x}{:016x}{:016x}{:016x}",
		n.hi_hi as u64, n.hi_lo, n.lo_hi, n.lo_lo
	)
}

/// Parses a string produced by [`combine_u128`] back into its limbs.
///
/// # Returns
/// `None` unless the input is `0x` followed by exactly 32 hex digits
pub fn parse_u128_hex(value: &str) -> Option<UInt128Parts> {
	let (hi, lo) = split_limbs(value)?;
	Some(UInt128Parts { hi, lo })
}

/// Parses a string produced by [`combine_i128`] back into its limbs.
pub fn parse_i128_hex(value: &str) -> Option<Int128Parts> {
	let (hi, lo) = split_limbs(value)?;
	Some(Int128Parts { hi: hi as i64, lo })
}

fn split_limbs(value: &str) -> Option<(u64, u64)> {
	let digits = value.strip_prefix("0x")?;
	if digits.len() != 32 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
		return None;
	}
	let hi = u64::from_str_radix(&digits[..16], 16).ok()?;
	let lo = u64::from_str_radix(&digits[16..], 16).ok()?;
	Some((hi, lo))
}
