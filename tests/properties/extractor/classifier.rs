//! Property-based tests for event type detection.

use crate::properties::strategies::symbol_name;
use proptest::{prelude::*, test_runner::Config};
use stellar_contract_extractor::{
	services::extractor::{canonical_event_type, detect_event_type, UNKNOWN_EVENT_TYPE},
	utils::tests::builders::stellar::symbol,
};
use stellar_xdr::curr::ScVal;

const KNOWN: [&str; 13] = [
	"transfer", "mint", "burn", "swap", "sync", "deposit", "withdraw", "approval", "stake",
	"unstake", "claim", "reward", "fee",
];

prop_compose! {
	// A known event name with every letter's case chosen at random
	fn known_name_any_case()(
		name in prop::sample::select(KNOWN.to_vec()),
		mask in any::<u32>(),
	) -> (String, String) {
		let mixed = name
			.chars()
			.enumerate()
			.map(|(i, c)| if mask & (1 << i) != 0 { c.to_ascii_uppercase() } else { c })
			.collect();
		(name.to_string(), mixed)
	}
}

fn non_symbol_topic() -> impl Strategy<Value = ScVal> {
	prop_oneof![
		any::<u32>().prop_map(ScVal::U32),
		any::<i64>().prop_map(ScVal::I64),
		Just(ScVal::Void),
		any::<bool>().prop_map(ScVal::Bool),
	]
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_known_names_are_canonical((canonical, mixed) in known_name_any_case()) {
		prop_assert_eq!(detect_event_type(&[symbol(&mixed)]), canonical);
	}

	#[test]
	fn test_other_names_pass_through(name in symbol_name()) {
		prop_assume!(!KNOWN.iter().any(|k| k.eq_ignore_ascii_case(&name)));
		prop_assert_eq!(canonical_event_type(&name), name.clone());
		prop_assert_eq!(detect_event_type(&[symbol(&name)]), name);
	}

	#[test]
	fn test_first_symbol_wins(
		prefix in prop::collection::vec(non_symbol_topic(), 0..4),
		first in symbol_name(),
		second in symbol_name(),
	) {
		let mut topics = prefix;
		topics.push(symbol(&first));
		topics.push(symbol(&second));
		prop_assert_eq!(detect_event_type(&topics), canonical_event_type(&first));
	}

	#[test]
	fn test_no_symbol_is_unknown(topics in prop::collection::vec(non_symbol_topic(), 0..6)) {
		prop_assert_eq!(detect_event_type(&topics), UNKNOWN_EVENT_TYPE);
	}
}
