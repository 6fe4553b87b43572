mod normalize;
mod rpc;

use alloy::primitives::Address;
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use tracing::Instrument;

pub use normalize::{encode_path_segment, normalize, AvatarUrlBuilder, NormalizeError};
pub use rpc::RpcLookup;

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
	#[error(transparent)]
	Normalize(#[from] NormalizeError),
	#[error("RPC call failed: {0}")]
	Contract(#[from] alloy::contract::Error),
}

/// Resolution primitives provided by an ENS deployment.
#[async_trait]
pub trait EnsLookup: Send + Sync {
	/// Primary name of `address`, if one is set.
	async fn lookup_address(&self, address: Address) -> Result<Option<String>, LookupError>;

	/// Address `name` points to. `name` must already be normalized.
	async fn resolve_name(&self, name: &str) -> Result<Option<Address>, LookupError>;
}

/// Runs lookups against the authoritative provider and, when configured, repeats every
/// successful lookup against a shadow provider in the background to log disagreements.
#[derive(Clone)]
pub struct Resolver {
	primary: Arc<dyn EnsLookup>,
	shadow: Option<Arc<dyn EnsLookup>>,
}

impl Resolver {
	pub fn new(primary: Arc<dyn EnsLookup>) -> Self {
		Self {
			primary,
			shadow: None,
		}
	}

	#[must_use]
	pub fn with_shadow(mut self, shadow: Arc<dyn EnsLookup>) -> Self {
		self.shadow = Some(shadow);
		self
	}

	pub async fn lookup_address(&self, address: Address) -> Result<Option<String>, LookupError> {
		let name = self.primary.lookup_address(address).await?;

		if let Some(shadow) = self.shadow.clone() {
			let expected = name.clone();
			spawn_comparison("lookup_address", address.to_checksum(None), expected, async move {
				shadow.lookup_address(address).await
			});
		}

		Ok(name)
	}

	pub async fn resolve_name(&self, name: &str) -> Result<Option<Address>, LookupError> {
		let address = self.primary.resolve_name(name).await?;

		if let Some(shadow) = self.shadow.clone() {
			let name = name.to_string();
			spawn_comparison("resolve_name", name.clone(), address, async move {
				shadow.resolve_name(&name).await
			});
		}

		Ok(address)
	}
}

fn spawn_comparison<T, F>(method: &'static str, input: String, expected: T, shadow: F)
where
	T: PartialEq + Debug + Send + 'static,
	F: std::future::Future<Output = Result<T, LookupError>> + Send + 'static,
{
	let span = tracing::info_span!("shadow_lookup", method, input = %input);

	tokio::spawn(
		async move {
			match shadow.await {
				Ok(actual) if actual == expected => {
					tracing::debug!("Shadow provider agrees");
				},
				Ok(actual) => {
					tracing::warn!(
						expected = ?expected,
						actual = ?actual,
						"Shadow provider returned a different result for {input}"
					);
				},
				Err(e) => {
					tracing::warn!(error = ?e, "Shadow lookup failed for {input}");
				},
			}
		}
		.instrument(span),
	);
}
