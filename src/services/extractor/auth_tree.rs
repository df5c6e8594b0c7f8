//! Cross-contract call graph reconstruction from Soroban authorization trees.
//!
//! Each authorization entry of an `InvokeHostFunction` operation carries a tree of
//! authorized invocations. Walking those trees depth-first yields caller to callee edges.
//! The resulting `execution_order` is structural only: it follows tree order, which is not
//! guaranteed to match the order in which the host actually executed the calls.

use stellar_xdr::curr::{
	SorobanAuthorizationEntry, SorobanAuthorizedFunction, SorobanAuthorizedInvocation,
	SorobanCredentials,
};

use crate::{
	models::{StellarAuthType, StellarContractCall},
	services::extractor::decoder::{contract_id_from_address, decode_sc_vals},
};

/// Collects call edges while walking the authorization trees of one operation
struct CallGraphBuilder {
	calls: Vec<StellarContractCall>,
	next_order: u32,
}

impl CallGraphBuilder {
	fn new() -> Self {
		Self {
			calls: Vec::new(),
			next_order: 0,
		}
	}

	/// Pre-order visit of one node. `caller` is `None` below nodes that are not contract
	/// function calls, so no edges are produced there.
	fn visit(
		&mut self,
		invocation: &SorobanAuthorizedInvocation,
		caller: Option<&str>,
		depth: u32,
		auth_type: StellarAuthType,
	) {
		let SorobanAuthorizedFunction::ContractFn(args) = &invocation.function else {
			for sub in invocation.sub_invocations.iter() {
				self.visit(sub, None, depth + 1, auth_type);
			}
			return;
		};

		let Some(target) = contract_id_from_address(&args.contract_address) else {
			tracing::debug!(
				depth,
				"Skipping authorized invocation whose target is not a contract"
			);
			return;
		};

		if let Some(from) = caller {
			if from != target {
				self.calls.push(StellarContractCall {
					from_contract: from.to_string(),
					to_contract: target.clone(),
					function: args.function_name.to_string(),
					arguments: decode_sc_vals(&args.args),
					call_depth: depth,
					auth_type,
					execution_order: self.next_order,
				});
				self.next_order += 1;
			}
		}

		for sub in invocation.sub_invocations.iter() {
			self.visit(sub, Some(&target), depth + 1, auth_type);
		}
	}
}

/// Returns the auth type of an authorization entry's root.
pub fn auth_type_of(entry: &SorobanAuthorizationEntry) -> StellarAuthType {
	match entry.credentials {
		SorobanCredentials::SourceAccount => StellarAuthType::SourceAccount,
		SorobanCredentials::Address(_) => StellarAuthType::Contract,
	}
}

/// Extracts contract call edges from an operation's authorization entries.
///
/// Every root is visited with the operation's primary contract as caller, at depth 0. An
/// edge `from -> to` is recorded for each node targeting a contract function unless
/// `from == to`. One `execution_order` counter is shared across all roots, so orders are
/// unique and strictly increasing within the operation.
///
/// # Arguments
/// * `entries` - The operation's authorization entries
/// * `primary_contract` - `C...` strkey of the invoked contract, if any
///
/// # Returns
/// The call edges in traversal order
pub fn extract_contract_calls(
	entries: &[SorobanAuthorizationEntry],
	primary_contract: Option<&str>,
) -> Vec<StellarContractCall> {
	let mut builder = CallGraphBuilder::new();
	for entry in entries {
		builder.visit(&entry.root_invocation, primary_contract, 0, auth_type_of(entry));
	}
	builder.calls
}
