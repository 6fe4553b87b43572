use alloy::{
	ens::{namehash, reverse_address, EnsRegistry, EnsResolver},
	primitives::{Address, B256},
	providers::{DynProvider, Provider, ProviderBuilder},
	rpc::client::RpcClient,
	transports::http::{reqwest, Http},
};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use super::{normalize, EnsLookup, LookupError};

/// ENS lookups performed with `eth_call`s against a JSON-RPC endpoint.
///
/// The underlying HTTP client is pooled, so a single instance is shared by every request.
#[derive(Clone)]
pub struct RpcLookup {
	provider: DynProvider,
	registry: Address,
}

impl RpcLookup {
	pub fn new(rpc_url: Url, registry: Address, timeout: Duration) -> Result<Self, reqwest::Error> {
		let client = reqwest::Client::builder().timeout(timeout).build()?;
		let is_local = rpc_url
			.host_str()
			.is_some_and(|host| host == "localhost" || host == "127.0.0.1");

		let rpc_client = RpcClient::new(Http::with_client(client, rpc_url), is_local);
		let provider = ProviderBuilder::new().connect_client(rpc_client).erased();

		Ok(Self { provider, registry })
	}

	/// Resolver contract responsible for `node`, if any.
	async fn resolver(&self, node: B256) -> Result<Option<Address>, LookupError> {
		let registry = EnsRegistry::new(self.registry, self.provider.clone());
		let resolver = missing_as_none(registry.resolver(node).call().await)?;

		Ok(resolver.filter(|resolver| !resolver.is_zero()))
	}

	async fn address_of(&self, node: B256) -> Result<Option<Address>, LookupError> {
		let Some(resolver) = self.resolver(node).await? else {
			return Ok(None);
		};

		let address = missing_as_none(
			EnsResolver::new(resolver, self.provider.clone())
				.addr(node)
				.call()
				.await,
		)?;

		Ok(address.filter(|address| !address.is_zero()))
	}
}

/// A call that returned no data or reverted means the record is not there.
/// Transport failures and timeouts stay errors.
fn missing_as_none<T>(result: Result<T, alloy::contract::Error>) -> Result<Option<T>, LookupError> {
	match result {
		Ok(value) => Ok(Some(value)),
		Err(alloy::contract::Error::ZeroData(function, _)) => {
			tracing::debug!(function, "Call returned no data");
			Ok(None)
		},
		Err(alloy::contract::Error::TransportError(e))
			if e.as_error_resp().is_some_and(|resp| {
				resp.code == 3 || resp.message.contains("execution reverted")
			}) =>
		{
			tracing::debug!(error = %e, "Call reverted");
			Ok(None)
		},
		Err(e) => Err(e.into()),
	}
}

#[async_trait]
impl EnsLookup for RpcLookup {
	#[tracing::instrument(skip(self))]
	async fn lookup_address(&self, address: Address) -> Result<Option<String>, LookupError> {
		let node = namehash(&reverse_address(&address));
		let Some(resolver) = self.resolver(node).await? else {
			return Ok(None);
		};

		let name = missing_as_none(
			EnsResolver::new(resolver, self.provider.clone())
				.name(node)
				.call()
				.await,
		)?;
		let Some(name) = name.filter(|name| !name.is_empty()) else {
			return Ok(None);
		};

		// Anyone can claim any name in their reverse record, so it only counts
		// if the name points back at the address.
		let Ok(normalized) = normalize(&name) else {
			tracing::debug!(name, "Ignoring reverse record that is not a valid name");
			return Ok(None);
		};
		if self.address_of(namehash(&normalized)).await? != Some(address) {
			tracing::debug!(name, "Ignoring reverse record that does not resolve back");
			return Ok(None);
		}

		Ok(Some(name))
	}

	#[tracing::instrument(skip(self))]
	async fn resolve_name(&self, name: &str) -> Result<Option<Address>, LookupError> {
		self.address_of(namehash(name)).await
	}
}
