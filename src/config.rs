use alloy::{ens::ENS_ADDRESS, primitives::Address};
use anyhow::Context;
use axum::Extension;
use std::{
	env::{self, VarError},
	num::ParseIntError,
	sync::Arc,
	time::Duration,
};
use url::Url;

use crate::ens::{AvatarUrlBuilder, Resolver, RpcLookup};

#[allow(clippy::module_name_repetitions)]
pub type ConfigExt = Extension<Arc<Config>>;
pub type ResolverExt = Extension<Arc<Resolver>>;

const DEFAULT_AVATAR_BASE_URL: &str = "https://metadata.ens.domains/mainnet/avatar";
const DEFAULT_RPC_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub struct Config {
	pub rpc_url: Url,
	pub shadow_rpc_url: Option<Url>,
	pub rpc_timeout: Duration,
	pub ens_registry: Address,
	pub avatars: AvatarUrlBuilder,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Env(#[from] VarError),
	#[error(transparent)]
	Timeout(#[from] ParseIntError),
	#[error(transparent)]
	EnvWithContext(#[from] anyhow::Error),
	#[error(transparent)]
	Url(#[from] url::ParseError),
	#[error("Failed to build RPC client: {0}")]
	Http(#[from] alloy::transports::http::reqwest::Error),
}

impl Config {
	pub fn from_env() -> Result<Self, Error> {
		let rpc_url: Url = env::var("RPC_URL")
			.context("RPC_URL environment variable not set")?
			.parse()?;

		let shadow_rpc_url = optional_var("SHADOW_RPC_URL")?
			.map(|url| url.parse::<Url>())
			.transpose()?;

		let rpc_timeout = rpc_timeout(optional_var("RPC_TIMEOUT_SECS")?.as_deref())?;

		let ens_registry = optional_var("ENS_REGISTRY_ADDRESS")?
			.map(|address| address.parse::<Address>())
			.transpose()
			.context("ENS_REGISTRY_ADDRESS is not a valid address")?
			.unwrap_or(ENS_ADDRESS);

		let avatar_base_url: Url = optional_var("ENS_AVATAR_BASE_URL")?
			.as_deref()
			.unwrap_or(DEFAULT_AVATAR_BASE_URL)
			.parse()?;

		Ok(Self {
			rpc_url,
			shadow_rpc_url,
			ens_registry,
			avatars: AvatarUrlBuilder::new(&avatar_base_url),
			rpc_timeout,
		})
	}

	/// Builds the process-wide resolver. Connections are pooled and shared by all requests.
	pub fn resolver_extension(&self) -> Result<ResolverExt, Error> {
		let primary = RpcLookup::new(self.rpc_url.clone(), self.ens_registry, self.rpc_timeout)?;
		let mut resolver = Resolver::new(Arc::new(primary));

		if let Some(shadow_rpc_url) = &self.shadow_rpc_url {
			tracing::info!("Comparing lookups against shadow provider {shadow_rpc_url}");

			let shadow =
				RpcLookup::new(shadow_rpc_url.clone(), self.ens_registry, self.rpc_timeout)?;
			resolver = resolver.with_shadow(Arc::new(shadow));
		}

		Ok(Extension(Arc::new(resolver)))
	}

	pub fn extension(self) -> ConfigExt {
		Extension(Arc::new(self))
	}
}

/// Reads an environment variable that may be unset or empty.
fn optional_var(key: &str) -> Result<Option<String>, VarError> {
	match env::var(key) {
		Ok(value) if value.trim().is_empty() => Ok(None),
		Ok(value) => Ok(Some(value)),
		Err(VarError::NotPresent) => Ok(None),
		Err(e) => Err(e),
	}
}

fn rpc_timeout(value: Option<&str>) -> Result<Duration, Error> {
	let secs = value.map_or(Ok(DEFAULT_RPC_TIMEOUT_SECS), str::parse)?;
	if secs == 0 {
		return Err(anyhow::anyhow!("RPC_TIMEOUT_SECS must be greater than zero").into());
	}

	Ok(Duration::from_secs(secs))
}
