use alloy::primitives::Address;
use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::LazyLock;

static ADDRESS_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^0x[0-9a-f]{40}$").unwrap());

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResolvePath {
	/// An Ethereum address or an ENS name. Mixed-case input is redirected to its lower-case form.
	pub address: String,
}

/// What a canonical (lower-cased) path segment refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
	Address(Address),
	Name(String),
}

impl Identity {
	/// Anything that is not a well-formed address is treated as a name.
	pub fn classify(input: &str) -> Self {
		if ADDRESS_REGEX.is_match(input) {
			if let Ok(address) = input.parse() {
				return Self::Address(address);
			}
		}

		Self::Name(input.to_string())
	}
}
