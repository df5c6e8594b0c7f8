//! Heuristic event type detection from event topics.

use stellar_xdr::curr::ScVal;

/// Event type reported when no topic is a symbol
pub const UNKNOWN_EVENT_TYPE: &str = "unknown";

/// Event names that are normalised to their lowercase canonical form
const KNOWN_EVENT_TYPES: [&str; 13] = [
	"transfer", "mint", "burn", "swap", "sync", "deposit", "withdraw", "approval", "stake",
	"unstake", "claim", "reward", "fee",
];

/// Detects the event type from an ordered list of topics.
///
/// The first symbol topic wins; other topic kinds are ignored. Well known names are matched
/// case-insensitively and returned in lowercase, any other symbol is returned verbatim.
///
/// # Arguments
/// * `topics` - The event topics, in emission order
///
/// # Returns
/// The detected event type, or `"unknown"` if no topic is a symbol
pub fn detect_event_type(topics: &[ScVal]) -> String {
	topics
		.iter()
		.find_map(|topic| match topic {
			ScVal::Symbol(sym) => Some(sym.to_string()),
			_ => None,
		})
		.map(|name| canonical_event_type(&name))
		.unwrap_or_else(|| UNKNOWN_EVENT_TYPE.to_string())
}

/// Maps a symbol to its canonical event type.
pub fn canonical_event_type(name: &str) -> String {
	KNOWN_EVENT_TYPES
		.iter()
		.find(|known| known.eq_ignore_ascii_case(name))
		.map(|known| known.to_string())
		.unwrap_or_else(|| name.to_string())
}
