#![no_main]

use libfuzzer_sys::fuzz_target;
use stellar_contract_extractor::services::extractor::decode_xdr_value;

fuzz_target!(|data: &[u8]| {
	let value = decode_xdr_value(data);
	let _ = value.to_json();
});
